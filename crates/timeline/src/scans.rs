//! LiDAR scan store with nearest-preceding time lookup.

use contracts::{PointCloud, ReplayError, ScanRecord, ScanSource, Timestamp};
use tracing::instrument;

/// Ordered LiDAR sweeps covering a half-open interval `[start, stop)`.
///
/// Timestamps must be strictly increasing, which makes the
/// nearest-preceding lookup a single `partition_point` binary search.
#[derive(Debug)]
pub struct ScanStore {
    records: Vec<ScanRecord>,
    stop: Timestamp,
}

impl ScanStore {
    /// Build a store whose coverage ends at the last record's timestamp.
    ///
    /// With this default the final record has an empty validity window:
    /// a query exactly at its timestamp is already outside `[start, stop)`.
    /// Loaders that know the true end of coverage should use
    /// [`ScanStore::with_stop_time`].
    ///
    /// # Errors
    /// `InvalidDataset` when the records are empty or not strictly
    /// increasing in time.
    pub fn new(records: Vec<ScanRecord>) -> Result<Self, ReplayError> {
        let stop = records
            .last()
            .map(|r| r.timestamp)
            .ok_or_else(|| ReplayError::invalid_dataset("scan store requires at least one record"))?;
        Self::with_stop_time(records, stop)
    }

    /// Build a store with an explicit coverage stop (one-past-last instant).
    ///
    /// # Errors
    /// `InvalidDataset` when the records are empty, not strictly
    /// increasing, or `stop` precedes the last record.
    pub fn with_stop_time(records: Vec<ScanRecord>, stop: Timestamp) -> Result<Self, ReplayError> {
        if records.is_empty() {
            return Err(ReplayError::invalid_dataset(
                "scan store requires at least one record",
            ));
        }
        for window in records.windows(2) {
            if window[1].timestamp <= window[0].timestamp {
                return Err(ReplayError::invalid_dataset(format!(
                    "scan timestamps must strictly increase, got {} -> {}",
                    window[0].timestamp, window[1].timestamp
                )));
            }
        }
        let last = records.last().map(|r| r.timestamp).unwrap_or_default();
        if stop < last {
            return Err(ReplayError::invalid_dataset(format!(
                "coverage stop {stop} precedes last record {last}"
            )));
        }
        Ok(Self { records, stop })
    }

    fn check_index(&self, index: usize) -> Result<(), ReplayError> {
        if index >= self.records.len() {
            return Err(ReplayError::out_of_range("scan", index, self.records.len()));
        }
        Ok(())
    }
}

impl ScanSource for ScanStore {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn start_time(&self) -> Timestamp {
        // Non-empty by construction
        self.records[0].timestamp
    }

    fn stop_time(&self) -> Timestamp {
        self.stop
    }

    fn timestamp_at(&self, index: usize) -> Result<Timestamp, ReplayError> {
        self.check_index(index)?;
        Ok(self.records[index].timestamp)
    }

    /// Nearest-preceding lookup: greatest index whose timestamp is <= `t`.
    ///
    /// O(log n); a tie on a record's exact timestamp returns that record.
    #[instrument(level = "trace", name = "scan_index_at_time", skip(self), fields(query = %t))]
    fn index_at_time(&self, t: Timestamp) -> Result<usize, ReplayError> {
        if !self.contains(t) {
            return Err(ReplayError::TimeOutOfRange {
                query: t,
                start: self.start_time(),
                stop: self.stop_time(),
            });
        }
        // contains() guarantees t >= records[0].timestamp, so the
        // partition point is at least 1.
        let after = self.records.partition_point(|r| r.timestamp <= t);
        Ok(after - 1)
    }

    fn cloud_at(&self, index: usize) -> Result<PointCloud, ReplayError> {
        self.check_index(index)?;
        Ok(self.records[index].cloud.clone())
    }
}
