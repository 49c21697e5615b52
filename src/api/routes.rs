use crate::api::handlers::{auth, health, users};
use crate::auth::middleware::auth_middleware;
use crate::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Base path of every API route.
pub const API_PREFIX: &str = "/api/v1";

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/ping", get(health::ping))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route(
            "/user",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/user/password", put(users::change_password))
        .route_layer(middleware::from_fn_with_state(
            state.token_service.clone(),
            auth_middleware,
        ));

    let app = Router::new().nest(API_PREFIX, public_routes.merge(protected_routes));

    #[cfg(not(feature = "swagger-ui"))]
    let app = app.route("/api-docs/openapi.json", get(openapi_json));

    let app: Router = app.with_state(state);

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", crate::api::docs::ApiDoc::openapi()),
        )
    };

    app.layer(cors_layer()).layer(TraceLayer::new_for_http())
}

#[cfg(not(feature = "swagger-ui"))]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    axum::Json(crate::api::docs::ApiDoc::openapi())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_LENGTH,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
}
