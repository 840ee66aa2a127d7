//! Clock collaborator and the spacecraft epoch.
//!
//! Reported time is expressed as seconds and nanoseconds elapsed since the
//! fixed epoch reference 2000-01-01T11:58:55.816Z (the J2000 epoch in UTC).

use chrono::{DateTime, Utc};

/// Unix timestamp of the spacecraft epoch, 2000-01-01T11:58:55.816Z.
pub const EPOCH_UNIX_SECS: i64 = 946_727_935;
/// Subsecond part of the spacecraft epoch, in nanoseconds.
pub const EPOCH_SUBSEC_NANOS: u32 = 816_000_000;

/// Time source consulted when building GET_TIME replies.
pub trait Clock {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Stock clock backed by the system real-time clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Decompose a clock reading into whole seconds and nanoseconds elapsed
/// since the spacecraft epoch.
///
/// Readings before the epoch clamp to (0, 0); a reading can only predate the
/// epoch if the node clock was never set.
pub fn epoch_elapsed(now: DateTime<Utc>) -> (u32, u32) {
    let mut secs = now.timestamp() - EPOCH_UNIX_SECS;
    let mut nanos = now.timestamp_subsec_nanos() as i64 - EPOCH_SUBSEC_NANOS as i64;
    if nanos < 0 {
        secs -= 1;
        nanos += 1_000_000_000;
    }
    if secs < 0 {
        return (0, 0);
    }
    (secs as u32, nanos as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_epoch_elapsed_at_epoch() {
        let epoch = Utc
            .timestamp_opt(EPOCH_UNIX_SECS, EPOCH_SUBSEC_NANOS)
            .unwrap();
        assert_eq!(epoch_elapsed(epoch), (0, 0));
    }

    #[test]
    fn test_epoch_elapsed_whole_second() {
        let t = Utc
            .timestamp_opt(EPOCH_UNIX_SECS + 10, EPOCH_SUBSEC_NANOS)
            .unwrap();
        assert_eq!(epoch_elapsed(t), (10, 0));
    }

    #[test]
    fn test_epoch_elapsed_subsecond_borrow() {
        // 9.5 seconds past the epoch lands mid-second relative to the epoch's
        // .816 subsecond offset.
        let t = Utc.timestamp_opt(EPOCH_UNIX_SECS + 10, 316_000_000).unwrap();
        assert_eq!(epoch_elapsed(t), (9, 500_000_000));
    }

    #[test]
    fn test_epoch_elapsed_before_epoch_clamps() {
        let t = Utc.timestamp_opt(EPOCH_UNIX_SECS - 100, 0).unwrap();
        assert_eq!(epoch_elapsed(t), (0, 0));
    }

    #[test]
    fn test_system_clock_at_or_after_epoch() {
        let (secs, nanos) = epoch_elapsed(SystemClock.now());
        assert!(secs > 0);
        assert!(nanos < 1_000_000_000);
    }
}
