use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the unix epoch, saturating at zero for clocks set before it.
pub fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
