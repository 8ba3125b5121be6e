//! End-to-end flow tests against the in-memory store

#[cfg(test)]
mod flow_tests {
    use crate::application::claims::SessionClaims;
    use crate::application::config::{AuthConfig, HashScheme};
    use crate::application::{
        LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, logout, resolve_principal,
    };
    use crate::domain::repository::{SessionRepository, TenantRepository};
    use crate::error::AuthError;
    use crate::infra::memory::InMemorySolarRepository;
    use crate::presentation::middleware::{
        GateDecision, GateSession, GateState, evaluate, request_gate,
    };
    use crate::presentation::router::auth_router_generic;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_config_raw() -> AuthConfig {
        // fallback hashing keeps the suite fast
        AuthConfig {
            password_scheme: HashScheme::Fallback,
            ..AuthConfig::development()
        }
    }

    fn test_config() -> Arc<AuthConfig> {
        Arc::new(test_config_raw())
    }

    fn seeded_repo() -> InMemorySolarRepository {
        let repo = InMemorySolarRepository::new();
        repo.seed_demo().unwrap();
        repo
    }

    fn gate_session(cookie: &str, config: &AuthConfig) -> GateSession {
        match SessionClaims::decode(cookie, &config.session_secret, Utc::now()) {
            Ok(claims) => GateSession::Valid(claims),
            Err(_) => GateSession::Invalid,
        }
    }

    /// The api binary's wiring in miniature: auth routes nested under
    /// /api/auth with the gate layered on top.
    fn routed_app(repo: InMemorySolarRepository, config: AuthConfig) -> Router {
        let gate = GateState::new(Arc::new(config.clone()));
        Router::new()
            .nest("/api/auth", auth_router_generic(repo, config))
            .layer(axum::middleware::from_fn_with_state(gate, request_gate))
    }

    async fn post_json(app: &Router, uri: &str, body: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get_path(app: &Router, uri: &str, cookie: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie.to_string());
        }
        app.clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_staff_login_reaches_admin() {
        let repo = seeded_repo();
        let config = test_config();
        let use_case = LoginUseCase::new(repo.clone(), config.clone());

        let output = use_case
            .execute(LoginInput {
                email: "admin@solar.ch".to_string(),
                password: "Admin123!".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(output.redirect_url, "/admin");

        // the issued cookie carries staff all the way through the gate
        let session = gate_session(&output.cookie_value, &config);
        assert_eq!(evaluate("/admin", &session), GateDecision::Allow);
        assert_eq!(
            evaluate("/portal/acme-gmbh/dashboard", &session),
            GateDecision::Allow
        );

        // without the cookie the same path bounces to login
        assert_eq!(
            evaluate("/admin", &GateSession::Missing),
            GateDecision::RedirectToLogin {
                original_path: "/admin".to_string(),
                clear_cookie: false,
            }
        );
    }

    #[tokio::test]
    async fn test_client_login_lands_on_portal() {
        let repo = seeded_repo();
        let config = test_config();
        let use_case = LoginUseCase::new(repo.clone(), config.clone());

        let output = use_case
            .execute(LoginInput {
                email: "client@acme.ch".to_string(),
                password: "Client123!".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(output.redirect_url, "/portal/acme-gmbh/dashboard");

        let session = gate_session(&output.cookie_value, &config);
        assert_eq!(
            evaluate("/portal/acme-gmbh/dashboard", &session),
            GateDecision::Allow
        );
        assert_eq!(evaluate("/admin", &session), GateDecision::RedirectToUnauthorized);
        assert_eq!(
            evaluate("/portal/other-ag/dashboard", &session),
            GateDecision::RedirectToUnauthorized
        );
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
        let repo = seeded_repo();
        let config = test_config();
        let use_case = LoginUseCase::new(repo, config);

        let wrong_password = use_case
            .execute(LoginInput {
                email: "admin@solar.ch".to_string(),
                password: "falsch".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = use_case
            .execute(LoginInput {
                email: "niemand@solar.ch".to_string(),
                password: "Admin123!".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_malformed_email_is_bad_input_not_bad_credentials() {
        let repo = seeded_repo();
        let use_case = LoginUseCase::new(repo, test_config());

        let err = use_case
            .execute(LoginInput {
                email: "kein-at-zeichen".to_string(),
                password: "Admin123!".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Ungültige E-Mail-Adresse");
    }

    #[tokio::test]
    async fn test_registration_disambiguates_slug() {
        let repo = seeded_repo();
        let config = test_config();
        let use_case = RegisterUseCase::new(repo.clone(), config.clone());

        // "Acme GmbH" is already taken by the seeded tenant
        let output = use_case
            .execute(RegisterInput {
                email: "neu@acme.ch".to_string(),
                password: "Sicher123".to_string(),
                display_name: "Neu".to_string(),
                company_name: "Acme GmbH".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(output.redirect_url, "/portal/acme-gmbh-1/dashboard");
        assert!(
            repo.find_tenant_by_slug("acme-gmbh-1")
                .await
                .unwrap()
                .is_some()
        );

        // the new owner is signed in immediately
        let session = gate_session(&output.cookie_value, &config);
        assert_eq!(
            evaluate("/portal/acme-gmbh-1/dashboard", &session),
            GateDecision::Allow
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = seeded_repo();
        let use_case = RegisterUseCase::new(repo, test_config());

        let err = use_case
            .execute(RegisterInput {
                email: "client@acme.ch".to_string(),
                password: "Sicher123".to_string(),
                display_name: "Doppelt".to_string(),
                company_name: "Doppelt AG".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_expired_session_self_heals() {
        let repo = seeded_repo();
        let config = test_config();
        let use_case = LoginUseCase::new(repo.clone(), config.clone());

        let output = use_case
            .execute(LoginInput {
                email: "client@acme.ch".to_string(),
                password: "Client123!".to_string(),
            })
            .await
            .unwrap();
        let claims =
            SessionClaims::decode(&output.cookie_value, &config.session_secret, Utc::now())
                .unwrap();

        // age the stored session past its expiry
        let mut session = repo.find_session(&claims.token).await.unwrap().unwrap();
        session.expires_at = Utc::now() - Duration::seconds(1);
        repo.create_session(&session).await.unwrap();

        assert!(resolve_principal(&repo, &claims.token).await.unwrap().is_none());
        // the stale row is gone after the first resolution
        assert!(repo.find_session(&claims.token).await.unwrap().is_none());
        assert!(resolve_principal(&repo, &claims.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_invalidates_session() {
        let repo = seeded_repo();
        let config = test_config();
        let use_case = LoginUseCase::new(repo.clone(), config.clone());

        let output = use_case
            .execute(LoginInput {
                email: "client@acme.ch".to_string(),
                password: "Client123!".to_string(),
            })
            .await
            .unwrap();
        let claims =
            SessionClaims::decode(&output.cookie_value, &config.session_secret, Utc::now())
                .unwrap();

        assert!(resolve_principal(&repo, &claims.token).await.unwrap().is_some());
        logout(&repo, Some(&claims.token)).await;
        assert!(resolve_principal(&repo, &claims.token).await.unwrap().is_none());

        // logging out again is harmless
        logout(&repo, Some(&claims.token)).await;
        logout(&repo, None).await;
    }

    #[tokio::test]
    async fn test_http_login_sets_cookie_and_passes_gate() {
        let app = routed_app(seeded_repo(), test_config_raw());

        let response = post_json(
            &app,
            "/api/auth/login",
            r#"{"email":"admin@solar.ch","password":"Admin123!"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("solar_session="));
        assert!(set_cookie.contains("HttpOnly"));
        let cookie_pair = set_cookie.split(';').next().unwrap().to_string();

        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["redirectUrl"], "/admin");

        // the gate accepts the issued cookie; /admin has no page route
        // in this app, so passing the gate surfaces as a plain 404
        let response = get_path(&app, "/admin", Some(&cookie_pair)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // without the cookie the gate redirects before any routing
        let response = get_path(&app, "/admin", None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login?redirect=/admin"
        );
    }

    #[tokio::test]
    async fn test_http_error_statuses() {
        let app = routed_app(seeded_repo(), test_config_raw());

        let wrong_password = post_json(
            &app,
            "/api/auth/login",
            r#"{"email":"admin@solar.ch","password":"falsch"}"#,
        )
        .await;
        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(wrong_password).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "E-Mail oder Passwort ist falsch");

        let malformed_email = post_json(
            &app,
            "/api/auth/login",
            r#"{"email":"kein-at-zeichen","password":"x"}"#,
        )
        .await;
        assert_eq!(malformed_email.status(), StatusCode::BAD_REQUEST);

        let duplicate_email = post_json(
            &app,
            "/api/auth/register",
            r#"{"email":"client@acme.ch","password":"Sicher123","name":"Doppelt","companyName":"Doppelt AG"}"#,
        )
        .await;
        assert_eq!(duplicate_email.status(), StatusCode::CONFLICT);
        let body = json_body(duplicate_email).await;
        assert_eq!(body["error"], "Diese E-Mail-Adresse ist bereits registriert");
    }

    #[tokio::test]
    async fn test_http_logout_clears_cookie() {
        let app = routed_app(seeded_repo(), test_config_raw());

        let login = post_json(
            &app,
            "/api/auth/login",
            r#"{"email":"client@acme.ch","password":"Client123!"}"#,
        )
        .await;
        let cookie_pair = login
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let logout = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/logout")
                    .header(header::COOKIE, cookie_pair.clone())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(logout.status(), StatusCode::OK);
        let cleared = logout
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cleared.starts_with("solar_session="));
        assert!(cleared.contains("Max-Age=0"));

        // the store-backed session is gone even though the cookie's
        // signature is still valid
        let me = get_path(&app, "/api/auth/me", Some(&cookie_pair)).await;
        let body = json_body(me).await;
        assert_eq!(body["authenticated"], false);
    }

    #[tokio::test]
    async fn test_corrupted_cookie_fails_closed() {
        let config = test_config();
        let session = gate_session("kaputt.cookie", &config);
        assert_eq!(
            evaluate("/portal/acme/dashboard", &session),
            GateDecision::RedirectToLogin {
                original_path: "/portal/acme/dashboard".to_string(),
                clear_cookie: true,
            }
        );
    }
}
