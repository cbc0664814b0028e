use super::handlers::{health, me, profile, user_login, user_register};
use utoipa::openapi::{InfoBuilder, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec.
/// Routes added outside (like `/` and the docs UI) are intentionally not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    let mut base_openapi = cargo_openapi();

    let mut users_tag = Tag::new("users");
    users_tag.description = Some("Account registration".to_string());

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Login and the authenticated account".to_string());

    let mut profile_tag = Tag::new("profile");
    profile_tag.description = Some("Profile aggregate and embedded collections".to_string());

    base_openapi.tags = Some(vec![users_tag, auth_tag, profile_tag]);

    OpenApiRouter::with_openapi(base_openapi)
        .routes(routes!(health::health))
        .routes(routes!(user_register::register))
        .routes(routes!(user_login::login))
        .routes(routes!(me::current_user))
        .routes(routes!(profile::upsert_profile))
        .routes(routes!(profile::my_profile))
        .routes(routes!(profile::list_profiles))
        .routes(routes!(profile::profile_by_user))
        .routes(routes!(profile::delete_profile))
        .routes(routes!(profile::entries::add_experience))
        .routes(routes!(profile::entries::remove_experience))
        .routes(routes!(profile::entries::add_education))
        .routes(routes!(profile::entries::remove_education))
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    OpenApiBuilder::new().info(info).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(
            spec.info.description.as_deref(),
            Some(env!("CARGO_PKG_DESCRIPTION"))
        );
    }

    #[test]
    fn openapi_tags_and_paths() {
        let spec = openapi();
        let tags = spec.tags.clone().unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "users"));
        assert!(tags.iter().any(|tag| tag.name == "auth"));
        assert!(tags.iter().any(|tag| tag.name == "profile"));

        for path in [
            "/users",
            "/auth",
            "/profile",
            "/profile/me",
            "/profile/user/{id}",
            "/profile/experience",
            "/profile/experience/{id}",
            "/profile/education",
            "/profile/education/{id}",
        ] {
            assert!(
                spec.paths.paths.contains_key(path),
                "missing path: {path}"
            );
        }
    }
}
