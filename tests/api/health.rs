use crate::helpers::{get_json_response_body, TestApp};
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn health_is_public(app: &mut TestApp) {
    let response = app.get_health().await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(response).await;
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}
