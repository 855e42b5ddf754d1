use crate::helpers::{
    add_backend_team, add_team, create_pull_request, get_json_response_body,
    TestApp,
};
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn empty_stats(app: &mut TestApp) {
    let body = get_json_response_body(app.get_pull_request_stats().await).await;
    assert_eq!(
        body,
        json!({
            "total_prs": 0,
            "open_prs": 0,
            "merged_prs": 0,
            "prs_with_reviewers": 0,
            "prs_without_reviewers": 0
        })
    );

    let body = get_json_response_body(app.get_reviewer_stats().await).await;
    assert_eq!(body, json!({ "reviewers": [] }));
}

#[test_context(TestApp)]
#[tokio::test]
async fn stats_follow_lifecycle(app: &mut TestApp) {
    add_backend_team(app).await;
    add_team(app, "solo", &[("sam", "Sam", true)]).await;

    for id in ["pr-1", "pr-2", "pr-3"] {
        create_pull_request(app, id, "alice").await;
    }
    create_pull_request(app, "pr-solo", "sam").await;
    app.post_pull_request_merge(&json!({ "pull_request_id": "pr-1" }))
        .await;

    let response = app.get_pull_request_stats().await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        get_json_response_body(response).await,
        json!({
            "total_prs": 4,
            "open_prs": 3,
            "merged_prs": 1,
            "prs_with_reviewers": 3,
            "prs_without_reviewers": 1
        })
    );

    let response = app.get_reviewer_stats().await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert_eq!(
        body,
        json!({
            "reviewers": [
                { "user_id": "bob", "username": "Bob", "total_assignments": 3 },
                { "user_id": "charlie", "username": "Charlie", "total_assignments": 3 },
                { "user_id": "alice", "username": "Alice", "total_assignments": 0 },
                { "user_id": "sam", "username": "Sam", "total_assignments": 0 }
            ]
        })
    );
}
