//! Incremental synchronization state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of the lower bound handed to the bookmark listing (UTC)
pub const WATERMARK_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// The watermark of the last completed run
///
/// A missing watermark means the next run lists the whole history.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncState {
    pub watermark: Option<DateTime<Utc>>,
}

impl SyncState {
    /// State for a first run, with no lower bound
    pub fn full() -> Self {
        Self::default()
    }

    /// State resuming after `watermark`
    pub fn at(watermark: DateTime<Utc>) -> Self {
        Self {
            watermark: Some(watermark),
        }
    }

    /// State to record once a run finishes at `now`.
    /// Never moves the watermark backwards.
    pub fn advance(&self, now: DateTime<Utc>) -> Self {
        let watermark = match self.watermark {
            Some(previous) if previous > now => previous,
            _ => now,
        };
        Self::at(watermark)
    }

    /// Lower bound formatted for the listing call
    pub fn since(&self) -> Option<String> {
        self.watermark
            .map(|w| w.format(WATERMARK_FORMAT).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_full_sync_has_no_bound() {
        assert_eq!(SyncState::full().since(), None);
    }

    #[test]
    fn test_since_is_24_hour_utc() {
        let state = SyncState::at(Utc.with_ymd_and_hms(2013, 3, 7, 18, 5, 9).unwrap());
        assert_eq!(state.since().as_deref(), Some("20130307T18:05:09"));
    }

    #[test]
    fn test_advance_moves_forward() {
        let earlier = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(SyncState::at(earlier).advance(later), SyncState::at(later));
        assert_eq!(SyncState::full().advance(earlier), SyncState::at(earlier));
    }

    #[test]
    fn test_advance_never_goes_backwards() {
        let earlier = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(SyncState::at(later).advance(earlier), SyncState::at(later));
    }
}
