use crate::helpers::{
    add_backend_team, create_pull_request, error_code, get_json_response_body,
    TestApp,
};
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn set_is_active_is_idempotent(app: &mut TestApp) {
    add_backend_team(app).await;

    for _ in 0..2 {
        let response = app
            .post_set_is_active(&json!({ "user_id": "bob", "is_active": false }))
            .await;
        assert_eq!(response.status().as_u16(), 200);

        let body = get_json_response_body(response).await;
        assert_eq!(
            body,
            json!({
                "user": {
                    "user_id": "bob",
                    "username": "Bob",
                    "team_name": "backend",
                    "is_active": false
                }
            })
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn set_is_active_for_unknown_user(app: &mut TestApp) {
    let response = app
        .post_set_is_active(&json!({ "user_id": "nobody", "is_active": true }))
        .await;
    assert_eq!(response.status().as_u16(), 404);
    let body = get_json_response_body(response).await;
    assert_eq!(error_code(&body), "NOT_FOUND");
}

#[test_context(TestApp)]
#[tokio::test]
async fn set_is_active_rejects_malformed_body(app: &mut TestApp) {
    let response = app.post_set_is_active(&json!({ "is_active": true })).await;
    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_eq!(error_code(&body), "INVALID_REQUEST");
}

#[test_context(TestApp)]
#[tokio::test]
async fn get_review_lists_assigned_pull_requests(app: &mut TestApp) {
    add_backend_team(app).await;
    create_pull_request(app, "pr-1", "alice").await;
    create_pull_request(app, "pr-2", "alice").await;

    let response = app.get_review("bob").await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;

    assert_eq!(body["user_id"], "bob");
    let pull_requests = body["pull_requests"].as_array().unwrap();
    assert_eq!(pull_requests.len(), 2);
    for pr in pull_requests {
        assert_eq!(pr["author_id"], "alice");
        assert_eq!(pr["status"], "OPEN");
        assert!(pr.get("assigned_reviewers").is_none());
    }

    // The author reviews nothing; unknown users simply have no reviews.
    for user_id in ["alice", "nobody"] {
        let body = get_json_response_body(app.get_review(user_id).await).await;
        assert_eq!(body["pull_requests"], json!([]));
    }
}
