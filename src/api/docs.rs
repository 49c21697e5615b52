use crate::api::handlers::{auth, health, users};
use crate::types::{
    ChangePasswordRequest, ErrorResponse, LoginRequest, LoginResponse, MessageResponse,
    PublicUser, RegisterRequest, UpdateUserRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI document for the `/api/v1` surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fiet API",
        version = "1.0",
        description = "User registration, login and JWT-protected profile management."
    ),
    paths(
        health::ping,
        auth::register,
        auth::login,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::change_password,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        ChangePasswordRequest,
        PublicUser,
        UpdateUserRequest,
        MessageResponse,
        ErrorResponse,
    )),
    modifiers(&BearerAuthAddon),
    tags(
        (name = "user", description = "Accounts and profiles"),
        (name = "ping", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Registers the `BearerAuth` scheme referenced by protected paths.
struct BearerAuthAddon;

impl Modify for BearerAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT Authorization header using the Bearer scheme. \
                             Example: \"Authorization: Bearer {token}\"",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serializable");
        let paths = doc["paths"].as_object().expect("paths object");

        for path in [
            "/api/v1/ping",
            "/api/v1/register",
            "/api/v1/login",
            "/api/v1/users",
            "/api/v1/user",
            "/api/v1/user/password",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }

        assert!(doc["components"]["securitySchemes"]["BearerAuth"].is_object());
    }
}
