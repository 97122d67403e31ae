// HTTP API tests - the router served on an ephemeral port.

mod support;

use project_assistant::model::ModelResponse;
use project_assistant::types::FunctionCall;
use reqwest::StatusCode;
use serde_json::{Map, Value, json};
use support::{ScriptedProvider, TestApp, closed_port, spawn_app};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NO_REPORTS: &str = "http://127.0.0.1:9/cost";

// ============================================================================
// Helpers
// ============================================================================

async fn post(app: &TestApp, path: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .http
        .post(app.url(path))
        .json(&body)
        .send()
        .await
        .expect("request");
    let status = response.status();
    (status, response.json().await.expect("json body"))
}

async fn get(app: &TestApp, path: &str) -> (StatusCode, Value) {
    let response = app.http.get(app.url(path)).send().await.expect("request");
    let status = response.status();
    (status, response.json().await.expect("json body"))
}

async fn delete(app: &TestApp, path: &str) -> StatusCode {
    app.http
        .delete(app.url(path))
        .send()
        .await
        .expect("request")
        .status()
}

async fn create_project(app: &TestApp, id: &str) {
    let (status, body) = post(app, "/api/projects", json!({"id": id, "name": "Demo"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id));
}

async fn create_source(app: &TestApp, project_id: &str, body: Value) -> i64 {
    let (status, body) = post(app, &format!("/api/projects/{project_id}/sources"), body).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_i64().expect("source id")
}

// ============================================================================
// Projects, data and sources
// ============================================================================

#[tokio::test]
async fn project_ids_are_generated_when_absent() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    let (status, body) = post(&app, "/api/projects", json!({"name": "Unnamed id"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let id = body["id"].as_str().expect("generated id");
    assert!(!id.is_empty());

    let (_, projects) = get(&app, "/api/projects").await;
    assert_eq!(projects[0]["id"], json!(id));
    assert_eq!(projects[0]["name"], json!("Unnamed id"));
}

#[tokio::test]
async fn deleting_a_project_removes_every_child_row() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    create_project(&app, "p1").await;
    create_project(&app, "keep").await;

    for n in 0..2 {
        let source_id = create_source(
            &app,
            "p1",
            json!({"name": format!("s{n}"), "url": "http://x.invalid"}),
        )
        .await;
        let (status, _) = post(
            &app,
            &format!("/api/sources/{source_id}/params"),
            json!({"name": "day", "required": true}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    for n in 0..3 {
        post(&app, "/api/projects/p1/data", json!({"content": format!("entry {n}")})).await;
    }
    post(&app, "/api/projects/keep/data", json!({"content": "survivor"})).await;

    assert_eq!(delete(&app, "/api/projects/p1").await, StatusCode::OK);

    assert!(app.db.list_entries("p1").expect("entries").is_empty());
    assert!(app.db.list_sources("p1").expect("sources").is_empty());
    assert!(app.db.project("p1").expect("project").is_none());
    assert_eq!(app.db.list_entries("keep").expect("entries").len(), 1);
    let (_, projects) = get(&app, "/api/projects").await;
    assert_eq!(projects.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn rows_for_unknown_parents_are_accepted() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;

    let (status, _) = post(&app, "/api/projects/ghost/data", json!({"content": "note"})).await;
    assert_eq!(status, StatusCode::OK);
    let source_id = create_source(&app, "ghost", json!({"name": "orphan", "url": "http://x"})).await;
    let (status, _) = post(&app, "/api/sources/999/params", json!({"name": "date"})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, sources) = get(&app, "/api/projects/ghost/sources").await;
    assert_eq!(sources[0]["id"], json!(source_id));
}

#[tokio::test]
async fn sources_get_defaults_and_can_be_updated() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    create_project(&app, "p1").await;
    let id = create_source(&app, "p1", json!({"name": "Orders", "url": "http://orders.invalid"})).await;

    let (_, sources) = get(&app, "/api/projects/p1/sources").await;
    let source = &sources[0];
    assert_eq!(source["method"], json!("GET"));
    assert_eq!(source["headers"], json!("{}"));
    assert_eq!(source["params"], json!("{}"));
    assert_eq!(source["category"], json!("常规"));

    let response = app
        .http
        .put(app.url(&format!("/api/sources/{id}")))
        .json(&json!({"name": "Orders v2", "url": "http://orders.invalid/v2", "method": "POST"}))
        .send()
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::OK);
    let (_, sources) = get(&app, "/api/projects/p1/sources").await;
    assert_eq!(sources[0]["name"], json!("Orders v2"));
    assert_eq!(sources[0]["method"], json!("POST"));

    let response = app
        .http
        .put(app.url("/api/sources/4040"))
        .json(&json!({"name": "ghost", "url": "http://x"}))
        .send()
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn params_are_listed_and_deleted() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    create_project(&app, "p1").await;
    let source_id = create_source(&app, "p1", json!({"name": "S", "url": "http://s.invalid"})).await;

    let (_, created) = post(
        &app,
        &format!("/api/sources/{source_id}/params"),
        json!({"name": "limit", "type": "number", "required": 1, "format": "integer"}),
    )
    .await;
    let (_, params) = get(&app, &format!("/api/sources/{source_id}/params")).await;
    assert_eq!(params[0]["type"], json!("number"));
    assert_eq!(params[0]["required"], json!(true));
    assert_eq!(params[0]["format"], json!("integer"));

    let param_id = created["id"].as_i64().expect("param id");
    assert_eq!(delete(&app, &format!("/api/params/{param_id}")).await, StatusCode::OK);
    let (_, params) = get(&app, &format!("/api/sources/{source_id}/params")).await;
    assert_eq!(params, json!([]));
}

// ============================================================================
// Running sources
// ============================================================================

#[tokio::test]
async fn execute_merges_dynamic_arguments() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/y"))
        .and(query_param("z", "1"))
        .and(query_param("a", "2"))
        .and(query_param("b", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    create_project(&app, "p1").await;
    let id = create_source(
        &app,
        "p1",
        json!({"name": "Y", "url": format!("{}/y?z=1", upstream.uri()), "params": r#"{"a":"1"}"#}),
    )
    .await;

    let (status, body) = post(&app, &format!("/api/sources/execute/{id}"), json!({"a": "2", "b": "3"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": {"ok": true}}));
}

#[tokio::test]
async fn execute_posts_json_bodies() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_json(json!({"team": "north", "from": "2024-01-01"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("accepted"))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    create_project(&app, "p1").await;
    let id = create_source(
        &app,
        "p1",
        json!({
            "name": "Q",
            "url": format!("{}/query", upstream.uri()),
            "method": "POST",
            "params": r#"{"team":"north"}"#
        }),
    )
    .await;

    let (status, body) = post(&app, &format!("/api/sources/execute/{id}"), json!({"from": "2024-01-01"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!("accepted"));
}

#[tokio::test]
async fn execute_unknown_source_is_not_found() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    let (status, body) = post(&app, "/api/sources/execute/77", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Source not found"}));
}

#[tokio::test]
async fn execute_unreachable_source_suggests_public_address() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    create_project(&app, "p1").await;
    let url = format!("http://{}/api", closed_port());
    let id = create_source(&app, "p1", json!({"name": "LAN", "url": url})).await;

    let (status, body) = post(&app, &format!("/api/sources/execute/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    let error = body["error"].as_str().expect("error");
    assert!(error.contains(&url));
    assert!(error.contains("公网可访问"));
}

#[tokio::test]
async fn test_endpoint_suggests_browser_fallback() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    let url = format!("http://{}/api", closed_port());

    let (status, body) = post(&app, "/api/sources/test", json!({"url": url, "method": "GET"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    let error = body["error"].as_str().expect("error");
    assert!(error.contains(&url));
    assert!(error.contains("本地浏览器测试"));
}

#[tokio::test]
async fn test_endpoint_reports_malformed_json_config() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    let (status, body) = post(
        &app,
        "/api/sources/test",
        json!({"url": "http://x.invalid", "headers": "{not json"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().expect("error").contains("headers"));
}

#[tokio::test]
async fn fetch_stores_an_external_entry() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kpi"))
        .and(query_param("period", "q1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kpi": 7})))
        .mount(&upstream)
        .await;

    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    create_project(&app, "p1").await;
    let id = create_source(
        &app,
        "p1",
        json!({
            "name": "KPI",
            "url": format!("{}/kpi", upstream.uri()),
            "params": r#"{"period":"q1"}"#,
            "category": "metrics"
        }),
    )
    .await;

    let (status, body) = post(&app, &format!("/api/sources/{id}/fetch"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"kpi": 7}));

    let (_, entries) = get(&app, "/api/projects/p1/data").await;
    assert_eq!(entries[0]["content"], json!(r#"{"kpi":7}"#));
    assert_eq!(entries[0]["category"], json!("metrics"));
    assert_eq!(entries[0]["source_type"], json!("external"));
}

// ============================================================================
// Search, chat and MCP bridge
// ============================================================================

#[tokio::test]
async fn search_requires_project_id_and_falls_back() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    create_project(&app, "p1").await;
    post(&app, "/api/projects/p1/data", json!({"content": "alpha", "category": "a"})).await;
    post(&app, "/api/projects/p1/data", json!({"content": "beta"})).await;

    let (status, body) = get(&app, "/api/ai/search?query=alpha").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "projectId is required"}));

    let (_, hits) = get(&app, "/api/ai/search?projectId=p1&query=alpha").await;
    assert_eq!(hits, json!([{"content": "alpha", "category": "a"}]));

    let (_, hits) = get(&app, "/api/ai/search?projectId=p1&query=gamma").await;
    assert_eq!(hits.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn chat_runs_tools_and_returns_the_final_answer() {
    let mut args = Map::new();
    args.insert("query".into(), json!("alpha"));
    let provider = ScriptedProvider::replying(vec![
        ModelResponse::new(String::new(), vec![FunctionCall::new("searchProjectData", args)]),
        ModelResponse::new("alpha is recorded".into(), Vec::new()),
    ]);
    let app = spawn_app(provider, NO_REPORTS).await;
    create_project(&app, "p1").await;
    post(&app, "/api/projects/p1/data", json!({"content": "alpha"})).await;

    let (status, body) = post(&app, "/api/projects/p1/chat", json!({"message": "what about alpha?"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], json!("alpha is recorded"));
    assert_eq!(body["toolResults"][0]["name"], json!("searchProjectData"));
    assert_eq!(body["droppedToolCalls"], json!(0));

    let requests = app.provider.requests().await;
    assert_eq!(requests.len(), 2);
    let instruction = requests[0].system_instruction.as_deref().expect("instruction");
    assert!(instruction.contains("\"Demo\" (ID: p1)"));
}

#[tokio::test]
async fn chat_for_unknown_project_is_not_found() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    let (status, body) = post(&app, "/api/projects/nope/chat", json!({"message": "hi"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Project not found"}));
}

#[tokio::test]
async fn chat_model_failure_is_bad_gateway() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    create_project(&app, "p1").await;
    let (status, body) = post(&app, "/api/projects/p1/chat", json!({"message": "hi"})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn mcp_call_bridge_serves_only_the_report() {
    let reports = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cost"))
        .and(query_param("startTime", "2024-02-01"))
        .and(query_param("endTime", "2024-02-29"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"teams": []})))
        .expect(1)
        .mount(&reports)
        .await;

    let app = spawn_app(ScriptedProvider::default(), &format!("{}/cost", reports.uri())).await;

    let (status, body) = post(
        &app,
        "/api/mcp/call",
        json!({"name": "get_team_cost_report", "arguments": {"startTime": "2024-02-01", "endTime": "2024-02-29"}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"][0]["type"], json!("text"));
    assert_eq!(body["content"][0]["text"], json!("{\n  \"teams\": []\n}"));

    let (status, body) = post(&app, "/api/mcp/call", json!({"name": "other", "arguments": {}})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Tool not found"}));
}

#[tokio::test]
async fn messages_without_a_live_stream_are_rejected() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    let response = app
        .http
        .post(app.url("/messages?sessionId=missing"))
        .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.expect("body"), "No active SSE transport");
}

#[tokio::test]
async fn openapi_document_lists_the_routes() {
    let app = spawn_app(ScriptedProvider::default(), NO_REPORTS).await;
    let (status, doc) = get(&app, "/api-doc/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    let paths = doc["paths"].as_object().expect("paths");
    assert!(paths.contains_key("/api/projects"));
    assert!(paths.contains_key("/api/sources/execute/{id}"));
    assert!(paths.contains_key("/api/ai/search"));

    let execute_body = &paths["/api/sources/execute/{id}"]["post"]["requestBody"];
    assert!(execute_body["content"]["application/json"]["schema"].is_object());
    assert_eq!(doc["components"]["schemas"]["DynamicArgs"]["type"], "object");
}
