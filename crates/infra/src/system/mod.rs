use chrono::Utc;

// Time is injected so that due dates, leases and backoff can be tested
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall clock used outside of tests
pub struct RealSys {}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
