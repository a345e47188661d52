pub mod access_control;
pub mod cors;
pub mod jwt_authenticate;
pub mod public_paths;
pub mod request_trace;
pub mod structured_logger;
pub mod trace_span;

pub use access_control::AccessControl;
pub use cors::cors_middleware;
pub use jwt_authenticate::JwtAuthenticate;
pub use request_trace::RequestTrace;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
