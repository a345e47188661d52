//! Test logging, installed once per test binary.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a subscriber that writes through the test harness capture.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `warn`. Setting
/// `TEST_LOG_FORMAT=json` switches to the JSON layout the server uses,
/// which helps when checking structured fields on security events:
///
/// ```bash
/// TEST_LOG=debug TEST_LOG_FORMAT=json cargo test -p training-backend --test auth_tests
/// ```
///
/// Safe to call from every test; only the first call has an effect.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let json = std::env::var("TEST_LOG_FORMAT").is_ok_and(|format| format == "json");

        let builder = fmt().with_env_filter(filter).with_test_writer().without_time();

        // Another subscriber may already be installed by the harness
        if json {
            builder.json().with_current_span(true).try_init().ok();
        } else {
            builder.try_init().ok();
        }
    });
}
