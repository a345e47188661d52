//! Paths that do not require authentication.
//!
//! Two tables share one matcher. [`PUBLIC_PATHS`] is the set the bearer-token
//! gate skips; [`PERMITTED_PATHS`] is the narrower set that access control
//! opens outside development. Rules are evaluated in order and the first
//! match wins.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMatcher {
    Prefix(&'static str),
    Exact(&'static str),
}

impl PathMatcher {
    pub fn matches(self, path: &str) -> bool {
        match self {
            PathMatcher::Prefix(prefix) => path.starts_with(prefix),
            PathMatcher::Exact(exact) => path == exact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Skip authentication entirely.
    Exempt,
    /// Continue to token extraction.
    Authenticate,
}

pub const PUBLIC_PATHS: &[(PathMatcher, Verdict)] = &[
    (PathMatcher::Prefix("/api/v1/auth/"), Verdict::Exempt),
    (PathMatcher::Prefix("/api/v1/environment"), Verdict::Exempt),
    (PathMatcher::Prefix("/swagger-ui/"), Verdict::Exempt),
    (PathMatcher::Exact("/swagger-ui.html"), Verdict::Exempt),
    (PathMatcher::Exact("/custom-swagger-ui"), Verdict::Exempt),
    (PathMatcher::Exact("/swagger-ui-custom.js"), Verdict::Exempt),
    (PathMatcher::Prefix("/v3/api-docs/"), Verdict::Exempt),
    (PathMatcher::Prefix("/api-docs/"), Verdict::Exempt),
    (PathMatcher::Prefix("/actuator/"), Verdict::Exempt),
];

/// Paths reachable without an identity outside development profiles.
pub const PERMITTED_PATHS: &[(PathMatcher, Verdict)] = &[
    (PathMatcher::Prefix("/api/v1/auth/"), Verdict::Exempt),
    (PathMatcher::Prefix("/swagger-ui/"), Verdict::Exempt),
    (PathMatcher::Exact("/swagger-ui.html"), Verdict::Exempt),
    (PathMatcher::Prefix("/v3/api-docs/"), Verdict::Exempt),
    (PathMatcher::Prefix("/api-docs/"), Verdict::Exempt),
    (PathMatcher::Prefix("/actuator/"), Verdict::Exempt),
];

/// Verdict of the first rule matching `path`; unmatched paths authenticate.
pub fn verdict_for(rules: &[(PathMatcher, Verdict)], path: &str) -> Verdict {
    rules
        .iter()
        .find(|(matcher, _)| matcher.matches(path))
        .map(|(_, verdict)| *verdict)
        .unwrap_or(Verdict::Authenticate)
}

pub fn is_public_path(path: &str) -> bool {
    verdict_for(PUBLIC_PATHS, path) == Verdict::Exempt
}

pub fn is_permitted_path(path: &str) -> bool {
    verdict_for(PERMITTED_PATHS, path) == Verdict::Exempt
}
