//! Integration tests for the specialized clients: grader credential
//! splitting, grading-data memoization, grade submission, and token
//! header injection.

use lazylink::{ClientConfig, GraderClient, TokenClient};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_grading_data_sends_split_credentials_and_memoizes() {
    let server = MockServer::start().await;
    let uri = server.uri();
    Mock::given(method("GET"))
        .and(path("/api/v2/submissions/42/"))
        .and(query_param("token", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "grade": 0,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let submission_url = format!("{uri}/api/v2/submissions/42/?token=abc");
    let mut grader = GraderClient::new(&submission_url, ClientConfig::default()).unwrap();
    assert_eq!(
        grader.grading_url(),
        format!("{uri}/api/v2/submissions/42/")
    );

    let id = grader
        .grading_data()
        .await
        .unwrap()
        .get("id")
        .await
        .unwrap()
        .as_i64();
    assert_eq!(id, Some(42));

    // The second access reuses the held resource (expect(1) above).
    let again = grader.grading_data().await.unwrap();
    assert_eq!(again.get("id").await.unwrap().as_i64(), Some(42));
}

#[tokio::test]
async fn test_grade_posts_form_fields_to_grading_url() {
    let server = MockServer::start().await;
    let uri = server.uri();
    Mock::given(method("POST"))
        .and(path("/api/v2/submissions/42/"))
        .and(query_param("token", "abc"))
        .and(body_string_contains("points=7"))
        .and(body_string_contains("max_points=10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accepted": true})))
        .expect(1)
        .mount(&server)
        .await;

    let submission_url = format!("{uri}/api/v2/submissions/42/?token=abc");
    let grader = GraderClient::new(&submission_url, ClientConfig::default()).unwrap();

    let response = grader
        .grade(vec![
            ("points".to_string(), "7".to_string()),
            ("max_points".to_string(), "10".to_string()),
        ])
        .await
        .unwrap();
    assert!(response.is_ok());
    assert_eq!(response.json(), Some(json!({"accepted": true})));
}

#[tokio::test]
async fn test_token_client_sends_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/me/"))
        .and(header("Authorization", "Token secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(format!("{}/api/v2", server.uri()))
        .build()
        .unwrap();
    let client = TokenClient::new("secret", config);

    let mut me = client.load_data("/users/me/").await.unwrap();
    assert_eq!(me.get("id").await.unwrap().as_i64(), Some(1));
}
