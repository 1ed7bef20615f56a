// Sweepstake Program - Interval gate
use solana_program::clock::UnixTimestamp;

/// Has at least `interval` seconds passed since `last_close`?
///
/// A clock reading earlier than `last_close` never counts as elapsed.
pub fn elapsed(now: UnixTimestamp, last_close: UnixTimestamp, interval: u64) -> bool {
    match now.checked_sub(last_close) {
        Some(delta) if delta >= 0 => delta as u64 >= interval,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_inclusive() {
        assert!(!elapsed(1_029, 1_000, 30));
        assert!(elapsed(1_030, 1_000, 30));
        assert!(elapsed(1_031, 1_000, 30));
    }

    #[test]
    fn test_zero_interval() {
        assert!(elapsed(1_000, 1_000, 0));
    }

    #[test]
    fn test_clock_behind_last_close() {
        assert!(!elapsed(999, 1_000, 0));
        assert!(!elapsed(i64::MIN, i64::MAX, 0));
    }

    #[test]
    fn test_wide_spans() {
        assert!(elapsed(i64::MAX, 0, u64::MAX >> 1));
        assert!(!elapsed(i64::MAX, 0, u64::MAX));
    }
}
