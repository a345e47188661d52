use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::config::profile::RuntimeProfile;
use crate::state::app_state::AppState;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    pub active_profile: String,
    pub version: String,
    pub build_time: String,
    pub environment: String,
}

impl EnvironmentInfo {
    pub fn for_profile(profile: &RuntimeProfile) -> Self {
        Self {
            active_profile: profile.name().to_string(),
            version: APP_VERSION.to_string(),
            build_time: build_time(),
            environment: profile.environment().label().to_string(),
        }
    }
}

/// Compile time of this binary as RFC 3339, from the build script.
pub fn build_time() -> String {
    option_env!("BUILD_TIMESTAMP")
        .and_then(|secs| secs.parse::<i64>().ok())
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .and_then(|ts| ts.format(&Rfc3339).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn environment(app_state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(EnvironmentInfo::for_profile(&app_state.profile))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(environment));
}
