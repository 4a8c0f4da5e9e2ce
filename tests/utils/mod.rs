//! Utilities for tests.
#![allow(dead_code)]

/// Asserts that the `Display` output of the value equals the expected string.
macro_rules! assert_eq_display {
    ($left:expr, $right:expr $(,)?) => {{
        let left = &$left;
        let right: &str = $right.as_ref();
        assert_eq!(left.to_string(), right, "`Display` output mismatch");
    }};
    ($left:expr, $right:expr, $($args:tt)*) => {{
        let left = &$left;
        let right: &str = $right.as_ref();
        assert_eq!(left.to_string(), right, $($args)*);
    }};
}

/// Initializes a logger printing to the test output.
///
/// Does nothing if a logger is already installed.
pub fn init_logger() {
    struct TestLogger;

    impl log::Log for TestLogger {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            println!("[{}] {}", record.level(), record.args());
        }

        fn flush(&self) {}
    }

    static LOGGER: TestLogger = TestLogger;
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
}
