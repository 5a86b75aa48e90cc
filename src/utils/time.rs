use chrono::Utc;

/// Milliseconds since the Unix epoch, the timestamp unit used by the
/// snapshot file and its consumers.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
