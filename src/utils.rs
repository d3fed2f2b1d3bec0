//! Utility helpers shared across the WASM frontend.

/// Current timestamp in **milliseconds** since UNIX epoch.
///
/// JS `Date` is used because it is available in the browser without extra
/// setup; chrono is reserved for formatting.
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// `HH:MM:SS` prefix for terminal log lines.
pub fn log_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn log_timestamp_is_clock_shaped() {
        let ts = log_timestamp();
        assert_eq!(ts.len(), 8);
        assert_eq!(ts.as_bytes()[2], b':');
        assert_eq!(ts.as_bytes()[5], b':');
    }
}
