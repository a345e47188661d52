use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::infra::state::build_state;
use backend::middleware::access_control::AccessControl;
use backend::middleware::cors::cors_middleware;
use backend::middleware::jwt_authenticate::JwtAuthenticate;
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::structured_logger::StructuredLogger;
use backend::middleware::trace_span::TraceSpan;
use backend::routes;
use backend::routes::environment::{build_time, APP_NAME, APP_VERSION};
use tracing::info;

mod telemetry;

const BANNER_RULE: &str = "=============================================================";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    info!("{BANNER_RULE}");
    info!("Application Name: {APP_NAME}");
    info!("Application Version: {APP_VERSION}");
    info!("Build Time: {}", build_time());
    info!("Active Profile: {}", config.profile.name());
    info!("Environment: {}", config.profile.environment().banner_label());
    info!("{BANNER_RULE}");

    if config.profile.is_development() {
        info!("Development profile active: access control permits all requests");
    }

    // Create application state using unified builder
    let app_state = match build_state(config.security.clone())
        .with_db(config.database_url.clone())
        .with_profile(config.profile.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!("✅ Database connected");

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);
    let cors = config.cors.clone();

    info!(host = %config.host, port = config.port, "Starting server");

    HttpServer::new(move || {
        // Last wrap runs first: RequestTrace -> TraceSpan -> StructuredLogger
        // -> CORS -> JwtAuthenticate -> AccessControl -> handler
        App::new()
            .wrap(AccessControl)
            .wrap(JwtAuthenticate)
            .wrap(cors_middleware(&cors))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
