pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::state::AppState;
use crate::{admin, auth, dashboard, meals, profile, progress, quiz, recipes};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/auth/register", post(auth::handlers::handle_register))
        .route("/api/auth/login", post(auth::handlers::handle_login))
        .route("/api/auth/me", get(auth::handlers::handle_me))
        // Onboarding quiz
        .route("/api/quiz/schema", get(quiz::handlers::handle_get_schema))
        .route("/api/quiz/validate", post(quiz::handlers::handle_validate_step))
        .route("/api/quiz/complete", post(quiz::handlers::handle_complete_quiz))
        // Profile
        .route(
            "/api/profile",
            get(profile::handlers::handle_get_profile)
                .put(profile::handlers::handle_update_profile)
                .delete(profile::handlers::handle_delete_account),
        )
        .route(
            "/api/profile/password",
            put(profile::handlers::handle_change_password),
        )
        // Recipes
        .route("/api/recipes", get(recipes::handlers::handle_list))
        .route("/api/recipes/generate", post(recipes::handlers::handle_generate))
        .route(
            "/api/recipes/analyze-image",
            post(recipes::handlers::handle_analyze_image),
        )
        .route("/api/recipes/save", post(recipes::handlers::handle_save))
        .route(
            "/api/recipes/suggestions",
            get(recipes::handlers::handle_suggestions),
        )
        .route("/api/recipes/:id", delete(recipes::handlers::handle_delete))
        // Meals
        .route(
            "/api/meals",
            get(meals::handlers::handle_list).post(meals::handlers::handle_create),
        )
        .route("/api/meals/stats", get(meals::handlers::handle_stats))
        .route("/api/meals/:id", delete(meals::handlers::handle_delete))
        // Weight progress
        .route(
            "/api/progress",
            get(progress::handlers::handle_list).post(progress::handlers::handle_create),
        )
        .route("/api/progress/summary", get(progress::handlers::handle_summary))
        .route("/api/progress/history", get(progress::handlers::handle_history))
        .route("/api/progress/chart", get(progress::handlers::handle_chart))
        .route(
            "/api/progress/chart.svg",
            get(progress::handlers::handle_chart_svg),
        )
        .route("/api/progress/:id", delete(progress::handlers::handle_delete))
        // Dashboard
        .route("/api/dashboard", get(dashboard::handlers::handle_dashboard))
        // Admin
        .route("/api/admin/users", get(admin::handlers::handle_list_users))
        .route("/api/admin/users/:id", delete(admin::handlers::handle_delete_user))
        .route(
            "/api/admin/users/:id/role",
            patch(admin::handlers::handle_update_role),
        )
        .route("/api/admin/stats", get(admin::handlers::handle_stats))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::Config;
    use crate::db::test_pool;
    use crate::llm_client::LlmClient;

    async fn test_router() -> Router {
        build_router(AppState::new(test_pool().await, None, Config::for_tests()))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = send_raw(app, method, uri, token, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn send_raw(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn register(app: &Router, email: &str) -> (String, i64) {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Ana", "email": email, "password": "segredo123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_i64().unwrap(),
        )
    }

    /// A full, valid answer set for the ten quiz steps.
    fn quiz_steps() -> Value {
        json!([
            { "selected": "lose_weight" },
            { "age": "34", "gender": "male", "weight": "80", "height": "178" },
            { "selected": "active" },
            { "selected": "high" },
            { "selected": "poor" },
            { "selected": "moderate" },
            { "checked": ["snacks", "soda"] },
            { "checked": ["beef", "eggs"] },
            { "checked": ["lactose"] },
            { "selected": "intermittent" }
        ])
    }

    #[tokio::test]
    async fn test_health_reports_ai_state() {
        let app = test_router().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "selva-api");
        assert_eq!(body["aiConfigured"], false);
    }

    #[tokio::test]
    async fn test_register_login_and_me() {
        let app = test_router().await;
        let (token, id) = register(&app, "Ana@Selva.test").await;

        let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], id);
        assert_eq!(body["user"]["email"], "ana@selva.test");
        assert!(body["user"].get("passwordHash").is_none());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ana@selva.test", "password": "segredo123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].is_string());

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ana@selva.test", "password": "errada" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let app = test_router().await;
        register(&app, "dup@selva.test").await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "Outra", "email": "dup@selva.test", "password": "segredo123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_missing_and_invalid_tokens() {
        let app = test_router().await;
        let (status, body) = send(&app, Method::GET, "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, _) = send(&app, Method::GET, "/api/auth/me", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_quiz_completion_feeds_profile() {
        let app = test_router().await;
        let (token, _) = register(&app, "quiz@selva.test").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/quiz/complete",
            Some(&token),
            Some(json!({ "steps": quiz_steps() })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["profile"]["quizCompleted"], true);
        assert_eq!(body["synced"], true);
        assert_eq!(body["autoCloseSecs"], 5);

        let (status, body) = send(&app, Method::GET, "/api/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"]["goal"], "lose_weight");
        assert_eq!(body["profile"]["weight"], 80.0);
        assert!(body["summary"].is_object());
    }

    #[tokio::test]
    async fn test_deleted_account_token_is_rejected() {
        let db = test_pool().await;
        let app = build_router(AppState::new(db.clone(), None, Config::for_tests()));
        let (token, _) = register(&app, "adeus@selva.test").await;

        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/profile",
            Some(&token),
            Some(json!({ "password": "segredo123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/quiz/complete",
            Some(&token),
            Some(json!({ "steps": quiz_steps() })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let (status, _) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn test_quiz_rejects_invalid_step() {
        let app = test_router().await;
        let (token, _) = register(&app, "quiz2@selva.test").await;

        let mut steps = vec![json!({}); 10];
        steps[0] = json!({ "selected": "lose_weight" });
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/quiz/complete",
            Some(&token),
            Some(json!({ "steps": steps })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["step"], 2);
    }

    #[tokio::test]
    async fn test_progress_flow() {
        let app = test_router().await;
        let (token, _) = register(&app, "peso@selva.test").await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/progress",
            Some(&token),
            Some(json!({ "weight": 0, "date": "2026-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/progress",
            Some(&token),
            Some(json!({ "weight": 90.0, "date": "2026-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["weight"], 90.0);

        let (_, body) = send(&app, Method::GET, "/api/progress/chart", Some(&token), None).await;
        assert!(body["points"].is_null());

        send(
            &app,
            Method::POST,
            "/api/progress",
            Some(&token),
            Some(json!({ "weight": 85.0, "date": "2026-02-01", "notes": "bom mês" })),
        )
        .await;
        send(
            &app,
            Method::PUT,
            "/api/profile",
            Some(&token),
            Some(json!({ "goalWeight": 80.0 })),
        )
        .await;

        let (status, body) =
            send(&app, Method::GET, "/api/progress/summary", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["startWeight"], 90.0);
        assert_eq!(body["currentWeight"], 85.0);
        assert_eq!(body["totalLost"], 5.0);
        assert_eq!(body["progressPercentage"], 50.0);

        let (_, body) = send(&app, Method::GET, "/api/progress/history?limit=1", Some(&token), None).await;
        let history = body["history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["change"], -5.0);
        assert_eq!(history[0]["trend"], "positive");

        let (_, body) = send(&app, Method::GET, "/api/progress/chart", Some(&token), None).await;
        assert_eq!(body["points"].as_array().unwrap().len(), 2);

        let (status, svg) =
            send_raw(&app, Method::GET, "/api/progress/chart.svg", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(svg).unwrap().contains("<circle"));

        let (status, _) = send(&app, Method::DELETE, "/api/progress/9999", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_backdated_entry_keeps_current_weight() {
        let app = test_router().await;
        let (token, _) = register(&app, "atrasado@selva.test").await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/quiz/complete",
            Some(&token),
            Some(json!({ "steps": quiz_steps() })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/progress",
            Some(&token),
            Some(json!({ "weight": 85.0, "date": "2026-02-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/progress",
            Some(&token),
            Some(json!({ "weight": 90.0, "date": "2026-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(&app, Method::GET, "/api/profile", Some(&token), None).await;
        assert_eq!(body["profile"]["weight"], 85.0);

        let (_, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(body["user"]["profile"]["weight"], 85.0);

        let (_, body) = send(&app, Method::GET, "/api/progress/summary", Some(&token), None).await;
        assert_eq!(body["startWeight"], 90.0);
        assert_eq!(body["currentWeight"], 85.0);

        // Same-day entries count in insertion order.
        send(
            &app,
            Method::POST,
            "/api/progress",
            Some(&token),
            Some(json!({ "weight": 84.0, "date": "2026-02-01" })),
        )
        .await;
        let (_, body) = send(&app, Method::GET, "/api/profile", Some(&token), None).await;
        assert_eq!(body["profile"]["weight"], 84.0);
    }

    #[tokio::test]
    async fn test_meals_and_dashboard() {
        let app = test_router().await;
        let (token, _) = register(&app, "refeicao@selva.test").await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/meals",
            Some(&token),
            Some(json!({ "name": "Omelete", "type": "brunch" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/meals",
            Some(&token),
            Some(json!({ "name": "Omelete", "type": "breakfast" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["type"], "breakfast");

        let (_, body) = send(&app, Method::GET, "/api/meals?filter=lunch", Some(&token), None).await;
        assert!(body["meals"].as_array().unwrap().is_empty());

        let (_, body) = send(&app, Method::GET, "/api/meals/stats", Some(&token), None).await;
        assert_eq!(body["totalMeals"], 1);
        assert_eq!(body["mealsByType"]["breakfast"], 1);
        assert_eq!(body["streak"], 1);

        let (status, body) = send(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["daysInProtocol"], 1);
        assert_eq!(body["totalMeals"], 1);
        assert!(body["dailyTip"].is_string());
    }

    #[tokio::test]
    async fn test_recipes_without_ai_use_fallback() {
        let app = test_router().await;
        let (token, _) = register(&app, "chef@selva.test").await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/recipes/generate",
            Some(&token),
            Some(json!({ "ingredients": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/recipes/generate",
            Some(&token),
            Some(json!({ "ingredients": "frango, brócolis" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "fallback");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/recipes/analyze-image",
            Some(&token),
            Some(json!({ "imageBase64": "aGVsbG8=" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let save = json!({ "recipe": body["recipe"].clone() });
        let (status, _) = send(&app, Method::POST, "/api/recipes/save", Some(&token), Some(save.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, Method::POST, "/api/recipes/save", Some(&token), Some(save)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_failed_image_analysis_uses_text_ingredients() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("image_url"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .expect(1)
            .mount(&server)
            .await;
        let recipe = json!({
            "name": "Frango Grelhado",
            "time": "20min",
            "calories": "450kcal",
            "protein": "40g",
            "ingredients": ["frango", "sal"],
            "steps": ["tempere", "grelhe"],
            "tip": "descanse a carne"
        })
        .to_string();
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("frango"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": recipe } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let llm = LlmClient::new("sk-test".into(), &server.uri())
            .unwrap()
            .with_retry_base(Duration::from_millis(1));
        let app = build_router(AppState::new(test_pool().await, Some(llm), Config::for_tests()));
        let (token, _) = register(&app, "foto@selva.test").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/recipes/generate",
            Some(&token),
            Some(json!({ "ingredients": "frango", "imageBase64": "AAAA" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["source"], "ai");
        assert_eq!(body["recipe"]["name"], "Frango Grelhado");
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_role() {
        let app = test_router().await;
        let (admin_token, admin_id) = register(&app, "admin@selva.test").await;
        let (user_token, user_id) = register(&app, "user@selva.test").await;

        let (status, _) = send(&app, Method::GET, "/api/admin/stats", Some(&user_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, Method::GET, "/api/admin/stats", Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalUsers"], 2);
        assert_eq!(body["newUsersToday"], 2);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/admin/users/{admin_id}"),
            Some(&admin_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::PATCH,
            &format!("/api/admin/users/{user_id}/role"),
            Some(&admin_token),
            Some(json!({ "role": "owner" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/admin/users/{user_id}"),
            Some(&admin_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, Method::GET, "/api/admin/users", Some(&admin_token), None).await;
        assert_eq!(body["users"].as_array().unwrap().len(), 1);
    }
}
