use crate::helpers::{error_code, get_json_response_body, TestApp};
use review_assigner::utils::constants::test;
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_without_token(app: &mut TestApp) {
    let response = app
        .post_as("/team/add", None, &json!({ "team_name": "backend" }))
        .await;
    assert_eq!(response.status().as_u16(), 401);

    let body = get_json_response_body(response).await;
    assert_eq!(error_code(&body), "UNAUTHORIZED");

    let response = app.get_as("/stats/reviewers", None, &[]).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_for_unknown_token(app: &mut TestApp) {
    let response = app
        .get_as("/stats/pullRequests", Some("not-a-token"), &[])
        .await;
    assert_eq!(response.status().as_u16(), 401);
}

#[test_context(TestApp)]
#[tokio::test]
async fn user_token_cannot_mutate(app: &mut TestApp) {
    let body = json!({
        "team_name": "backend",
        "members": [{ "user_id": "u1", "username": "Alice", "is_active": true }]
    });

    let response = app.post_as("/team/add", Some(test::USER_TOKEN), &body).await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.post_as("/team/add", Some(test::ADMIN_TOKEN), &body).await;
    assert_eq!(response.status().as_u16(), 201);
}

#[test_context(TestApp)]
#[tokio::test]
async fn admin_token_can_read(app: &mut TestApp) {
    let response = app
        .get_as("/stats/pullRequests", Some(test::ADMIN_TOKEN), &[])
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn bare_token_is_accepted(app: &mut TestApp) {
    let response = app
        .http_client
        .get(format!("{}/stats/reviewers", &app.address))
        .header("Authorization", test::USER_TOKEN)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
}
