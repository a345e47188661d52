//! Security and audit events.
//!
//! Every event carries the current trace id and an `event` field so that
//! the JSON log stream can be filtered without parsing messages.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

const MAX_DETAIL_LEN: usize = 256;

/// Record an audited operation performed by `username`.
pub fn audit(operation: &str, username: &str, details: &str) {
    let trace_id = trace_ctx::trace_id();
    let time = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());
    let details = truncate(details, MAX_DETAIL_LEN);

    info!(
        event = "AUDIT",
        %trace_id,
        operation,
        user = username,
        details = %Redacted(&details),
        time = %time,
        "Audited operation"
    );
}

/// Log a security-relevant login failure event.
pub fn login_failed(reason: &str, username: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        user = username,
        reason,
        "Authentication failure"
    );
}

/// Truncate `input` to at most `max_chars` characters, appending `...` when cut.
pub fn truncate(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &input[..byte_idx]),
        None => input.to_string(),
    }
}
