use actix_web::{web, HttpResponse, Responder};

use crate::models::StoredUser;
use crate::services::{ranking_service, user_service};
use crate::AppState;

/// GET /
/// Literal greeting, health-check only
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Greeting", body = String)
    )
)]
pub async fn greeting() -> impl Responder {
    HttpResponse::Ok().body("Hello World!")
}

/// GET /fetch-and-store-users
/// Runs the ranking for the configured location and upserts the result
#[utoipa::path(
    get,
    path = "/fetch-and-store-users",
    tag = "Users",
    responses(
        (status = 200, description = "Ranking refreshed and stored"),
        (status = 500, description = "Every search page failed, nothing was ranked")
    )
)]
pub async fn fetch_and_store_users(state: web::Data<AppState>) -> HttpResponse {
    log::info!(
        "🚀 GET /fetch-and-store-users - location '{}'",
        state.location
    );

    let report = ranking_service::rank_top_users(&state.github, &state.location).await;

    if report.upstream_outage() {
        log::error!(
            "❌ Error fetching and storing users: all {} search pages failed",
            ranking_service::SEARCH_PAGES
        );
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "message": "Error fetching and storing users"
        }));
    }

    if report.failed_pages > 0 || report.failed_lookups > 0 {
        log::warn!(
            "⚠️  Partial ranking: {} pages failed, {} lookups failed",
            report.failed_pages,
            report.failed_lookups
        );
    }

    let stats = user_service::upsert_all(&state.db, &report.candidates).await;
    log::info!(
        "✅ Stored {} of {} ranked users",
        stats.stored,
        report.candidates.len()
    );

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Users fetched and stored successfully"
    }))
}

/// GET /get-users
/// Returns every stored user as a JSON array
#[utoipa::path(
    get,
    path = "/get-users",
    tag = "Users",
    responses(
        (status = 200, description = "All stored users", body = [StoredUser]),
        (status = 500, description = "Database failure")
    )
)]
pub async fn get_users(state: web::Data<AppState>) -> HttpResponse {
    match user_service::list_all(&state.db).await {
        Ok(users) => {
            log::info!("✅ {} users fetched from database", users.len());
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            log::error!("❌ Error fetching users from database: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Error fetching users from database"
            }))
        }
    }
}
