//! CLI command implementations.

mod info;
mod play;
mod seek;
mod validate;

pub use info::run_info;
pub use play::run_play;
pub use seek::run_seek;
pub use validate::run_validate;
