/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Upstream services exchange timestamps as fractional Unix seconds.
pub type EpochSecs = f64;

/// Convert a timestamp to fractional Unix seconds.
pub fn to_epoch_secs(ts: Timestamp) -> EpochSecs {
    ts.timestamp_millis() as f64 / 1000.0
}

/// Current time as fractional Unix seconds.
pub fn now_epoch_secs() -> EpochSecs {
    to_epoch_secs(chrono::Utc::now())
}
