//! Time-related utility functions.
//!
//! The wire contract timestamps fixes and probes in milliseconds since the
//! Unix epoch, so everything that needs "now" goes through one helper.

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// # Example
///
/// ```
/// let before = driverlink::time::epoch_millis_now();
/// let after = driverlink::time::epoch_millis_now();
/// assert!(after >= before);
/// ```
pub fn epoch_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_millis_is_recent() {
        let now = epoch_millis_now();
        // Sometime after 2020-01-01 and before 2100-01-01.
        assert!(now > 1_577_836_800_000);
        assert!(now < 4_102_444_800_000);
    }

    #[test]
    fn epoch_millis_is_monotonic_enough() {
        let a = epoch_millis_now();
        let b = epoch_millis_now();
        assert!(b >= a);
    }
}
