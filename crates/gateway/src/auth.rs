//! HTTP Basic authentication with role-gated dispatch.
//!
//! The authorization table mirrors the service's security rules:
//! health/info and `GET /chat` are public, `POST /chat` and the whole
//! `/hr-assistant` surface require any authenticated user, and `/status`
//! requires the admin role. When auth is disabled in config (development
//! mode) every route is open.

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::Next;
use base64::Engine as _;
use tracing::warn;

use charla_config::{AuthConfig, UserConfig};

use crate::SharedState;

/// The access level a route demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

/// The authorization table. Unknown routes default to authenticated.
pub fn required_access(method: &Method, path: &str) -> Access {
    if path == "/chat/health" || path == "/info" {
        return Access::Public;
    }
    if path == "/chat" && *method == Method::GET {
        return Access::Public;
    }
    if path == "/status" {
        return Access::Admin;
    }
    Access::Authenticated
}

/// Authorization middleware applied to every route.
pub async fn authorize(
    State(state): State<SharedState>,
    req: axum::extract::Request,
    next: Next,
) -> Result<axum::response::Response, StatusCode> {
    let access = required_access(req.method(), req.uri().path());

    if access == Access::Public || !state.config.auth.enabled {
        return Ok(next.run(req).await);
    }

    let Some(user) = authenticate(req.headers(), &state.config.auth) else {
        warn!(path = %req.uri().path(), "unauthorized request — missing or invalid credentials");
        return Err(StatusCode::UNAUTHORIZED);
    };

    if access == Access::Admin && user.role != "admin" {
        warn!(user = %user.name, path = %req.uri().path(), "forbidden — admin role required");
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(req).await)
}

/// Resolve the Basic credentials in `headers` against the configured users.
fn authenticate<'a>(headers: &HeaderMap, auth: &'a AuthConfig) -> Option<&'a UserConfig> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (name, password) = credentials.split_once(':')?;

    auth.users
        .iter()
        .find(|u| u.name == name && u.password == password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> AuthConfig {
        AuthConfig {
            enabled: true,
            users: vec![
                UserConfig {
                    name: "ana".into(),
                    password: "secreta".into(),
                    role: "user".into(),
                },
                UserConfig {
                    name: "root".into(),
                    password: "admin123".into(),
                    role: "admin".into(),
                },
            ],
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    fn basic(user: &str, password: &str) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
        format!("Basic {encoded}")
    }

    #[test]
    fn authorization_table() {
        assert_eq!(
            required_access(&Method::GET, "/chat/health"),
            Access::Public
        );
        assert_eq!(required_access(&Method::GET, "/info"), Access::Public);
        assert_eq!(required_access(&Method::GET, "/chat"), Access::Public);
        assert_eq!(
            required_access(&Method::POST, "/chat"),
            Access::Authenticated
        );
        assert_eq!(
            required_access(&Method::POST, "/hr-assistant/query"),
            Access::Authenticated
        );
        assert_eq!(
            required_access(&Method::GET, "/hr-assistant/benefits"),
            Access::Authenticated
        );
        assert_eq!(required_access(&Method::GET, "/status"), Access::Admin);
        // Unknown routes never fall open.
        assert_eq!(
            required_access(&Method::GET, "/anything-else"),
            Access::Authenticated
        );
    }

    #[test]
    fn authenticate_valid_credentials() {
        let auth = users();
        let headers = headers_with(&basic("ana", "secreta"));
        let user = authenticate(&headers, &auth).unwrap();
        assert_eq!(user.name, "ana");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn authenticate_rejects_wrong_password() {
        let auth = users();
        let headers = headers_with(&basic("ana", "incorrecta"));
        assert!(authenticate(&headers, &auth).is_none());
    }

    #[test]
    fn authenticate_rejects_unknown_user() {
        let auth = users();
        let headers = headers_with(&basic("desconocido", "secreta"));
        assert!(authenticate(&headers, &auth).is_none());
    }

    #[test]
    fn authenticate_rejects_malformed_header() {
        let auth = users();
        assert!(authenticate(&headers_with("Bearer token"), &auth).is_none());
        assert!(authenticate(&headers_with("Basic !!!not-base64!!!"), &auth).is_none());
        assert!(authenticate(&HeaderMap::new(), &auth).is_none());
    }
}
