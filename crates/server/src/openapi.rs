use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub id: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginResponse { pub token: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub id: String, pub password: String, pub name: String, pub email: String, pub phone: String }

#[derive(ToSchema)]
pub struct ProfileResponse { pub name: String, pub email: String, pub phone: String, pub credit: i64, pub electricity: i64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::auth::user_info,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            ProfileResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/auth/login", "/auth/register", "/auth/userinfo"] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
