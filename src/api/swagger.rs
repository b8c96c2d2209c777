use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GitHub Ranking Service API",
        version = "1.0.0",
        description = "Ranks GitHub users for a configured location by public repository count, stores the ranking in MongoDB and serves it back as JSON.\n\n**Flow:** `GET /fetch-and-store-users` refreshes the ranking, `GET /get-users` returns the stored records."
    ),
    paths(
        // Health
        crate::api::health::health_check,
        crate::api::users::greeting,

        // Users
        crate::api::users::fetch_and_store_users,
        crate::api::users::get_users,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::user::StoredUser,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints for monitoring service status."),
        (name = "Users", description = "Ranking refresh and stored-user listing endpoints."),
    )
)]
pub struct ApiDoc;
