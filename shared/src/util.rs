/// Current UTC timestamp in milliseconds.
///
/// All timestamps in the queue system are Unix milliseconds (i64).
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
