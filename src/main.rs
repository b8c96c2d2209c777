mod api;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use services::github_service::GithubClient;

/// Shared handler state. Configuration is read once here and passed in
/// explicitly, no ambient globals.
pub struct AppState {
    pub db: database::MongoDB,
    pub github: GithubClient,
    pub location: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let mongodb_uri = env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let github_token =
        env::var("GITHUB_ACCESS_TOKEN").expect("GITHUB_ACCESS_TOKEN must be set");
    let location = env::var("LOCATION").unwrap_or_else(|_| "Sri Lanka".to_string());

    log::info!("🚀 Starting Ranking Service...");
    log::info!("📍 Ranking location: {}", location);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");

    log::info!("✅ MongoDB connected successfully");

    let github = GithubClient::new(&github_token).expect("Failed to build GitHub client");

    let state = web::Data::new(AppState {
        db,
        github,
        location,
    });

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        // The table page may be served from anywhere, so CORS stays open
        let cors = Cors::permissive();

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/", web::get().to(api::users::greeting))
            .route("/health", web::get().to(api::health::health_check))
            // Ranking refresh and stored users
            .route(
                "/fetch-and-store-users",
                web::get().to(api::users::fetch_and_store_users),
            )
            .route("/get-users", web::get().to(api::users::get_users))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
