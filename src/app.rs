use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{appointments, auth, hotels};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router(&state))
                .merge(hotels::router(&state))
                .merge(appointments::router(&state))
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{AUTHORIZATION, CONTENT_TYPE, SET_COOKIE},
            Method, Request, StatusCode,
        },
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", t));
        }
        let body = match body {
            Some(v) => {
                req = req.header(CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(req.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router, email: &str, role: &str) -> String {
        let res = send(
            app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "name": "Somchai",
                "tel": "0812345678",
                "email": email,
                "password": "secret1",
                "role": role,
            })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        json_body(res).await["token"].as_str().unwrap().to_string()
    }

    fn hotel_body() -> Value {
        json!({
            "name": "Riverside",
            "address": "99 Charoen Krung Rd",
            "district": "Bang Rak",
            "province": "Bangkok",
            "postalcode": "10500",
            "region": "Central",
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(AppState::fake());
        let res = send(&app, Method::GET, "/api/v1/health", None, None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn register_sets_cookie_and_rejects_duplicates() {
        let app = build_app(AppState::fake());
        let body = json!({
            "name": "Somchai",
            "tel": "0812345678",
            "email": "somchai@example.com",
            "password": "secret1",
        });

        let res = send(&app, Method::POST, "/api/v1/auth/register", None, Some(body.clone())).await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res.headers()[SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));
        let v = json_body(res).await;
        assert_eq!(v["success"], true);
        assert!(v["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(v["userid"].as_str().is_some());

        let res = send(&app, Method::POST, "/api/v1/auth/register", None, Some(body)).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(res).await, json!({ "error": "Email already registered" }));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let app = build_app(AppState::fake());
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/auth/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await, json!({ "error": "Invalid request format" }));
    }

    #[tokio::test]
    async fn login_and_me() {
        let app = build_app(AppState::fake());
        register(&app, "nok@example.com", "user").await;

        let res = send(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "nok@example.com", "password": "wrong" })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(res).await, json!({ "error": "Invalid password" }));

        let res = send(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "nok@example.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let token = json_body(res).await["token"].as_str().unwrap().to_string();

        let res = send(&app, Method::GET, "/api/v1/auth/me", None, None).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let me = json_body(res).await;
        assert_eq!(me["email"], "nok@example.com");
        assert_eq!(me["role"], "user");
        assert!(me.get("password").is_none());
    }

    #[tokio::test]
    async fn logout_expires_cookie() {
        let app = build_app(AppState::fake());
        let res = send(&app, Method::GET, "/api/v1/auth/logout", None, None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res.headers()[SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert_eq!(json_body(res).await["success"], true);
    }

    #[tokio::test]
    async fn hotel_writes_require_admin() {
        let app = build_app(AppState::fake());
        let user = register(&app, "user@example.com", "user").await;
        let admin = register(&app, "admin@example.com", "admin").await;

        let res = send(&app, Method::POST, "/api/v1/hotels", None, Some(hotel_body())).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = send(&app, Method::POST, "/api/v1/hotels", Some(&user), Some(hotel_body())).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(res).await, json!({ "error": "Access denied" }));

        let res = send(&app, Method::POST, "/api/v1/hotels", Some(&admin), Some(hotel_body())).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let id = json_body(res).await["id"].as_str().unwrap().to_string();

        // reads stay public
        let res = send(&app, Method::GET, &format!("/api/v1/hotels/{}", id), None, None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["postalcode"], "10500");

        let res = send(&app, Method::GET, "/api/v1/hotels/not-an-id", None, None).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unsupported_method_on_hotel_is_405() {
        let app = build_app(AppState::fake());
        let uri = format!("/api/v1/hotels/{}", bson::oid::ObjectId::new().to_hex());
        let res = send(&app, Method::PATCH, &uri, None, None).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

        // PUT exists, so the auth layer still answers first
        let res = send(&app, Method::PUT, &uri, None, Some(hotel_body())).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn deleting_hotel_removes_its_appointments() {
        let st = AppState::fake();
        let app = build_app(st.clone());
        let user = register(&app, "guest@example.com", "user").await;
        let admin = register(&app, "boss@example.com", "admin").await;

        let res = send(&app, Method::POST, "/api/v1/hotels", Some(&admin), Some(hotel_body())).await;
        let id = json_body(res).await["id"].as_str().unwrap().to_string();
        let booking_uri = format!("/api/v1/hotels/{}/appointments", id);

        let res = send(
            &app,
            Method::POST,
            &booking_uri,
            None,
            Some(json!({ "apptDate": "2026-12-24T15:00:00Z" })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        for day in ["2026-12-24T15:00:00Z", "2026-12-25T15:00:00Z"] {
            let res = send(
                &app,
                Method::POST,
                &booking_uri,
                Some(&user),
                Some(json!({ "apptDate": day })),
            )
            .await;
            assert_eq!(res.status(), StatusCode::CREATED);
            let v = json_body(res).await;
            assert_eq!(v["message"], "Appointment created successfully");
            assert_eq!(v["appointment"]["hotel"], id.as_str());
        }

        let res = send(&app, Method::GET, "/api/v1/appointments", Some(&user), None).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let res = send(&app, Method::GET, "/api/v1/appointments", Some(&admin), None).await;
        assert_eq!(json_body(res).await.as_array().map(Vec::len), Some(2));

        let res = send(&app, Method::DELETE, &format!("/api/v1/hotels/{}", id), Some(&admin), None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            json_body(res).await,
            json!({ "success": true, "deletedAppointments": 2 })
        );

        assert!(st.appointments.list().await.unwrap().is_empty());
        let res = send(&app, Method::GET, &format!("/api/v1/hotels/{}", id), None, None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
