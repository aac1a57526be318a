#[cfg(test)]
mod tests {
    use crate::auth::StaticTokenSource;
    use crate::client::{FirebaseClient, FirebaseError, Message, MulticastMessage, Notification};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    const SEND_PATH: &str = "/v1/projects/demo/messages:send";

    fn client(server: &MockServer) -> FirebaseClient {
        FirebaseClient::new(
            reqwest::Client::new(),
            server.uri(),
            "demo",
            Arc::new(StaticTokenSource("test-token".to_string())),
        )
    }

    fn notification() -> Option<Notification> {
        Some(Notification {
            title: "T".to_string(),
            body: "B".to_string(),
        })
    }

    /// Answers with a message name derived from the token, or an FCM error
    /// for tokens starting with `bad`.
    struct EchoToken;

    impl Respond for EchoToken {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
            let token = body["message"]["token"].as_str().unwrap_or_default().to_string();
            if token.starts_with("bad") {
                ResponseTemplate::new(400).set_body_json(json!({
                    "error": {
                        "code": 400,
                        "message": "The registration token is not a valid FCM registration token",
                        "status": "INVALID_ARGUMENT",
                        "details": [{
                            "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                            "errorCode": "INVALID_ARGUMENT"
                        }]
                    }
                }))
            } else {
                ResponseTemplate::new(200)
                    .set_body_json(json!({"name": format!("projects/demo/messages/{}", token)}))
            }
        }
    }

    #[tokio::test]
    async fn test_send_message_posts_fcm_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(json!({
                "message": {
                    "token": "abc",
                    "notification": {"title": "T", "body": "B"},
                    "data": {"k": "v"}
                }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "projects/demo/messages/1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let message = Message {
            token: "abc".to_string(),
            notification: notification(),
            data: HashMap::from([("k".to_string(), "v".to_string())]),
        };
        let name = client(&server).send_message(&message).await.unwrap();
        assert_eq!(name, "projects/demo/messages/1");
    }

    #[tokio::test]
    async fn test_empty_fields_are_omitted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .and(body_json(json!({"message": {"token": "abc", "notification": {}}})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "projects/demo/messages/2"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let message = Message {
            token: "abc".to_string(),
            notification: Some(Notification::default()),
            data: HashMap::new(),
        };
        assert!(client(&server).send_message(&message).await.is_ok());
    }

    #[tokio::test]
    async fn test_api_error_prefers_fcm_error_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "code": 404,
                    "message": "Requested entity was not found.",
                    "status": "NOT_FOUND",
                    "details": [{
                        "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                        "errorCode": "UNREGISTERED"
                    }]
                }
            })))
            .mount(&server)
            .await;

        let message = Message {
            token: "stale".to_string(),
            ..Default::default()
        };
        let err = client(&server).send_message(&message).await.unwrap_err();
        match &err {
            FirebaseError::ApiError { status, message } => {
                assert_eq!(status, "UNREGISTERED");
                assert_eq!(message, "Requested entity was not found.");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(err.to_string(), "UNREGISTERED: Requested entity was not found.");
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let message = Message {
            token: "abc".to_string(),
            ..Default::default()
        };
        let err = client(&server).send_message(&message).await.unwrap_err();
        assert_eq!(err.to_string(), "503: upstream unavailable");
    }

    #[tokio::test]
    async fn test_empty_token_is_rejected_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .send_message(&Message::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FirebaseError::InvalidMessage(_)));
    }

    #[tokio::test]
    async fn test_multicast_reports_each_token_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(EchoToken)
            .expect(4)
            .mount(&server)
            .await;

        let message = MulticastMessage {
            tokens: vec!["t1".into(), "bad-1".into(), "t3".into(), "t4".into()],
            notification: notification(),
            data: HashMap::new(),
        };
        let batch = client(&server).send_multicast(&message).await.unwrap();

        assert_eq!(batch.success_count, 3);
        assert_eq!(batch.failure_count, 1);
        let ids: Vec<Option<&str>> = batch
            .responses
            .iter()
            .map(|r| r.message_id.as_deref())
            .collect();
        assert_eq!(
            ids,
            vec![
                Some("projects/demo/messages/t1"),
                None,
                Some("projects/demo/messages/t3"),
                Some("projects/demo/messages/t4"),
            ]
        );
        assert!(!batch.responses[1].success);
        assert!(batch.responses[1]
            .error
            .as_deref()
            .unwrap()
            .starts_with("INVALID_ARGUMENT"));
    }

    #[tokio::test]
    async fn test_multicast_validates_token_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let client = client(&server);

        let empty = MulticastMessage::default();
        assert!(matches!(
            client.send_multicast(&empty).await,
            Err(FirebaseError::InvalidMessage(_))
        ));

        let too_many = MulticastMessage {
            tokens: (0..501).map(|i| format!("t{}", i)).collect(),
            ..Default::default()
        };
        assert!(matches!(
            client.send_multicast(&too_many).await,
            Err(FirebaseError::InvalidMessage(_))
        ));
    }
}
