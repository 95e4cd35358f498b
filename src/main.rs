//! Performance test server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use perftest_server::api;
use perftest_server::config::Config;
use perftest_server::middleware::RequestLogger;
use perftest_server::services::{LifecycleController, TestRegistry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be 'development' or 'production' if set");
            error!("  - PERF_PORT must be a valid port number");
            error!("  - PERF_MAX_CONCURRENT_TESTS must be a positive integer");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Performance Test Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    // Shared state: the registry owns all test records, the lifecycle
    // controller runs started tests on a bounded worker pool.
    let registry = Arc::new(TestRegistry::new());
    let controller = web::Data::new(LifecycleController::new(
        Arc::clone(&registry),
        config.max_concurrent_tests,
    ));
    let registry_data = web::Data::from(registry);
    let controller_handle = controller.clone();

    info!(
        "Background worker pool: {} concurrent tests",
        config.max_concurrent_tests
    );

    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if is_development {
            // Permissive CORS for development
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(registry_data.clone())
            .app_data(controller.clone())
            .service(
                web::scope("/api/v1/performance")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_performance_routes),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
            )
    });

    let result = server.workers(worker_count).bind(&bind_address)?.run().await;

    // The server has stopped accepting requests; close the worker pool so
    // tests still queued for a permit reach FAILED instead of hanging.
    info!("Server stopped, closing background worker pool");
    controller_handle.shutdown();

    result
}
