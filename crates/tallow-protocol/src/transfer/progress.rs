//! Transfer progress tracking
//!
//! [`TransferProgress`] is the internal speed/ETA tracker a pipeline updates
//! as bytes move; [`ProgressEvent`] is the snapshot handed to a host
//! adapter's `onProgress` callback, carrying enough context (peer, file,
//! mode) to render a UI without the adapter reaching back into the pipeline.

use crate::ids::{PeerId, TransferId};
use crate::transfer::metadata::TransferMode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// A point-in-time progress report for one transfer, suitable for handing
/// to a host adapter's progress callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "peerId")]
    pub peer_id: PeerId,
    #[serde(rename = "fileId")]
    pub file_id: TransferId,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
    pub percent: f64,
    /// Bytes per second.
    pub speed: u64,
    pub mode: TransferMode,
}

/// Internal speed/ETA tracker for one transfer's byte stream.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    /// Bytes transferred
    pub bytes_transferred: u64,
    /// Total bytes
    pub total_bytes: u64,
    /// Current speed in bytes/second
    pub speed_bps: u64,
    /// Estimated time remaining in seconds
    pub eta_seconds: u64,
    /// Transfer start time
    start_time: Instant,
}

impl TransferProgress {
    /// Create new progress tracker
    pub fn new(total_bytes: u64) -> Self {
        Self {
            bytes_transferred: 0,
            total_bytes,
            speed_bps: 0,
            eta_seconds: 0,
            start_time: Instant::now(),
        }
    }

    /// Update progress
    pub fn update(&mut self, bytes_transferred: u64) {
        self.bytes_transferred = bytes_transferred;
        let elapsed = self.start_time.elapsed();

        if elapsed.as_secs() > 0 {
            self.speed_bps = bytes_transferred / elapsed.as_secs();

            if self.speed_bps > 0 {
                let remaining = self.total_bytes.saturating_sub(bytes_transferred);
                self.eta_seconds = remaining / self.speed_bps;
            }
        }
    }

    /// Get completion percentage
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        (self.bytes_transferred as f64 / self.total_bytes as f64) * 100.0
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Build the `onProgress` snapshot for this tracker's current state.
    pub fn snapshot(
        &self,
        peer_id: PeerId,
        file_id: TransferId,
        file_name: String,
        mode: TransferMode,
    ) -> ProgressEvent {
        ProgressEvent {
            peer_id,
            file_id,
            file_name,
            file_size: self.total_bytes,
            percent: self.percentage(),
            speed: self.speed_bps,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_zero_total_is_zero() {
        let progress = TransferProgress::new(0);
        assert_eq!(progress.percentage(), 0.0);
    }

    #[test]
    fn percentage_reflects_bytes_transferred() {
        let mut progress = TransferProgress::new(200);
        progress.update(50);
        assert_eq!(progress.percentage(), 25.0);
    }

    #[test]
    fn snapshot_carries_file_and_peer_context() {
        let mut progress = TransferProgress::new(100);
        progress.update(40);
        let event = progress.snapshot(
            PeerId::from("peer-1"),
            TransferId::generate(),
            "a.bin".to_string(),
            TransferMode::P2p,
        );
        assert_eq!(event.file_name, "a.bin");
        assert_eq!(event.file_size, 100);
        assert_eq!(event.percent, 40.0);
    }

    #[test]
    fn progress_event_serializes_with_camel_case_fields() {
        let progress = TransferProgress::new(10);
        let event = progress.snapshot(
            PeerId::from("peer-1"),
            TransferId::generate(),
            "a.bin".to_string(),
            TransferMode::Relay,
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["fileName"], "a.bin");
        assert_eq!(json["fileSize"], 10);
        assert_eq!(json["mode"], "relay");
    }
}
