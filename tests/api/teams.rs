use crate::helpers::{add_team, error_code, get_json_response_body, TestApp};
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_with_sorted_members(app: &mut TestApp) {
    let schema = json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "type": "object",
      "properties": {
        "team": {
          "type": "object",
          "properties": {
            "team_name": { "type": "string", "minLength": 1, "maxLength": 255 },
            "members": {
              "type": "array",
              "items": {
                "type": "object",
                "properties": {
                  "user_id": { "type": "string" },
                  "username": { "type": "string" },
                  "is_active": { "type": "boolean" }
                },
                "required": ["user_id", "username", "is_active"]
              }
            }
          },
          "required": ["team_name", "members"]
        }
      },
      "required": ["team"]
    });

    let body = add_team(
        app,
        "backend",
        &[("u2", "Zed", true), ("u1", "Amy", false)],
    )
    .await;

    assert!(
        jsonschema::is_valid(&schema, &body),
        "response does not match schema: {body}"
    );
    assert_eq!(body["team"]["members"][0]["username"], "Amy");
    assert_eq!(body["team"]["members"][0]["is_active"], false);
    assert_eq!(body["team"]["members"][1]["username"], "Zed");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_team_exists(app: &mut TestApp) {
    add_team(app, "backend", &[("u1", "Amy", true)]).await;

    let response = app
        .post_team_add(&json!({
            "team_name": "backend",
            "members": [{ "user_id": "u9", "username": "Other", "is_active": true }]
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_eq!(error_code(&body), "TEAM_EXISTS");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_invalid_input(app: &mut TestApp) {
    let test_cases = [
        json!({ "team_name": "", "members": [{ "user_id": "u1", "username": "A", "is_active": true }] }),
        json!({ "team_name": "backend", "members": [] }),
        json!({ "team_name": "backend", "members": [{ "user_id": " ", "username": "A", "is_active": true }] }),
        json!({ "team_name": "backend", "members": [{ "user_id": "u1", "username": "", "is_active": true }] }),
        json!({ "team_name": "backend", "members": [
            { "user_id": "u1", "username": "A", "is_active": true },
            { "user_id": "u1", "username": "B", "is_active": true }
        ] }),
        json!({ "team_name": "x".repeat(256), "members": [{ "user_id": "u1", "username": "A", "is_active": true }] }),
        json!({ "members": [] }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_team_add(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {:?}",
            test_case
        );
        let body = get_json_response_body(response).await;
        assert_eq!(error_code(&body), "INVALID_REQUEST");
    }

    let response = app.get_team("backend").await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn get_team_returns_current_members(app: &mut TestApp) {
    add_team(
        app,
        "backend",
        &[("u1", "Amy", true), ("u2", "Ben", true)],
    )
    .await;
    // u2 moves to platform.
    add_team(app, "platform", &[("u2", "Benjamin", false)]).await;

    let response = app.get_team("backend").await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert_eq!(
        body,
        json!({
            "team_name": "backend",
            "members": [{ "user_id": "u1", "username": "Amy", "is_active": true }]
        })
    );

    let body = get_json_response_body(app.get_team("platform").await).await;
    assert_eq!(body["members"][0]["username"], "Benjamin");
}

#[test_context(TestApp)]
#[tokio::test]
async fn get_team_errors(app: &mut TestApp) {
    let response = app.get_team("nobody").await;
    assert_eq!(response.status().as_u16(), 404);
    let body = get_json_response_body(response).await;
    assert_eq!(error_code(&body), "NOT_FOUND");

    let response = app.get_team("").await;
    assert_eq!(response.status().as_u16(), 400);
}
