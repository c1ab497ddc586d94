use amocrm_mock::{app, router, MockState, ACCOUNT_ID};
use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const TOKEN: &str = "access-0";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed(method: &str, uri: &str, token: &str, body: Option<&str>) -> Request<String> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(body) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .unwrap(),
        None => builder.body(String::new()).unwrap(),
    }
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn refresh_body(refresh_token: &str) -> String {
    json!({
        "client_id": "mock-client",
        "client_secret": "mock-secret",
        "grant_type": "refresh_token",
        "refresh_token": refresh_token,
        "redirect_uri": "https://example.com/oauth",
    })
    .to_string()
}

// --- authorization ---

#[tokio::test]
async fn missing_token_gets_problem_body() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/v4/leads").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["status"], 401);
    assert_eq!(body["title"], "Unauthorized");
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let resp = app()
        .oneshot(authed("GET", "/api/v4/account", "nope", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- token endpoint ---

#[tokio::test]
async fn refresh_rotates_both_tokens() {
    let state = MockState::default();

    let resp = router(state.clone())
        .oneshot(json_request("POST", "/oauth2/access_token", &refresh_body("refresh-0")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["access_token"], state.access_token().await.as_str());
    assert_eq!(body["refresh_token"], state.refresh_token().await.as_str());
    assert_eq!(state.refresh_calls(), 1);

    let old = router(state.clone())
        .oneshot(authed("GET", "/api/v4/account", TOKEN, None))
        .await
        .unwrap();
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    let new_token = state.access_token().await;
    let new = router(state)
        .oneshot(authed("GET", "/api/v4/account", &new_token, None))
        .await
        .unwrap();
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
async fn stale_refresh_token_is_revoked() {
    let state = MockState::default();
    let resp = router(state.clone())
        .oneshot(json_request("POST", "/oauth2/access_token", &refresh_body("refresh-old")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["detail"], "Token has been revoked");
    assert_eq!(state.refresh_calls(), 0);
}

#[tokio::test]
async fn expired_access_token_gets_401() {
    let state = MockState::default();
    state.expire_access_token().await;

    let resp = router(state)
        .oneshot(authed("GET", "/api/v4/leads", TOKEN, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- legacy session ---

#[tokio::test]
async fn legacy_login_opens_cookie_session() {
    let state = MockState::default();
    let resp = router(state.clone())
        .oneshot(json_request(
            "POST",
            "/private/api/auth.php?type=json",
            r#"{"USER_LOGIN":"manager@example.com","USER_HASH":"mock-hash"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let cookies: Vec<String> = resp
        .headers()
        .get_all(http::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookies.len(), 2);
    let session = cookies[0].split(';').next().unwrap().to_string();
    assert!(session.starts_with("session_id="));
    assert_eq!(body_json(resp).await["response"]["auth"], true);

    let account = router(state)
        .oneshot(
            Request::builder()
                .uri("/api/v2/account")
                .header(http::header::COOKIE, format!("user_lang=ru; {session}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(account.status(), StatusCode::OK);
    assert_eq!(body_json(account).await["response"]["account"]["id"], ACCOUNT_ID);
}

#[tokio::test]
async fn legacy_login_with_wrong_hash_fails() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/private/api/auth.php?type=json",
            r#"{"USER_LOGIN":"manager@example.com","USER_HASH":"wrong"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["response"]["auth"], false);
    assert_eq!(body["response"]["error_code"], "110");
}

// --- account ---

#[tokio::test]
async fn account_includes_requested_sections() {
    let resp = app()
        .oneshot(authed("GET", "/api/v4/account?with=amojo_id,version", TOKEN, None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["subdomain"], "mock");
    assert!(body["amojo_id"].is_string());
}

// --- leads ---

#[tokio::test]
async fn empty_lead_list_is_no_content() {
    let resp = app().oneshot(authed("GET", "/api/v4/leads", TOKEN, None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn unknown_lead_id_on_update_is_400() {
    let resp = app()
        .oneshot(authed("PATCH", "/api/v4/leads", TOKEN, Some(r#"[{"id":999,"price":1}]"#)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lead_lifecycle() {
    use tower::Service;

    let state = MockState::default();
    let mut app = router(state.clone()).into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed(
            "POST",
            "/api/v4/leads",
            TOKEN,
            Some(r#"[{"name":"First","price":100},{"name":"Second","request_id":"abc"}]"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created = body_json(resp).await;
    assert_eq!(created["_embedded"]["leads"][0], json!({"id": 1, "request_id": "0"}));
    assert_eq!(created["_embedded"]["leads"][1], json!({"id": 2, "request_id": "abc"}));
    assert_eq!(state.lead_count().await, 2);

    // page of one
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", "/api/v4/leads?limit=1&page=2", TOKEN, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["_page"], 2);
    assert_eq!(page["_embedded"]["leads"][0]["name"], "Second");

    // past the end
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", "/api/v4/leads?limit=1&page=3", TOKEN, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("PATCH", "/api/v4/leads", TOKEN, Some(r#"[{"id":1,"price":250}]"#)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["_embedded"]["leads"][0]["id"], 1);

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", "/api/v4/leads/1", TOKEN, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let lead = body_json(resp).await;
    assert_eq!(lead["name"], "First");
    assert_eq!(lead["price"], 250);

    // missing id
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", "/api/v4/leads/42", TOKEN, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// --- webhooks ---

#[tokio::test]
async fn webhook_subscription_lifecycle() {
    let state = MockState::default();

    let resp = router(state.clone())
        .oneshot(authed(
            "POST",
            "/api/v4/webhooks",
            TOKEN,
            Some(r#"{"destination":"https://hooks.example.com/a","settings":["add_lead"]}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["settings"], json!(["add_lead"]));

    router(state.clone())
        .oneshot(authed(
            "POST",
            "/api/v4/webhooks",
            TOKEN,
            Some(r#"{"destination":"https://hooks.example.com/b","settings":["update_lead"]}"#),
        ))
        .await
        .unwrap();

    let resp = router(state.clone())
        .oneshot(authed(
            "GET",
            "/api/v4/webhooks?filter%5Bdestination%5D=https%3A%2F%2Fhooks.example.com%2Fb",
            TOKEN,
            None,
        ))
        .await
        .unwrap();
    let listed = body_json(resp).await;
    assert_eq!(listed["_total_items"], 1);
    assert_eq!(listed["_embedded"]["webhooks"][0]["destination"], "https://hooks.example.com/b");

    let resp = router(state.clone())
        .oneshot(authed(
            "DELETE",
            "/api/v4/webhooks",
            TOKEN,
            Some(r#"{"destination":"https://hooks.example.com/a"}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = router(state)
        .oneshot(authed("GET", "/api/v4/webhooks", TOKEN, None))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["_total_items"], 1);
}
