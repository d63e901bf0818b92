//! The backend HTTP contract.
//!
//! [`Backend`] is the seam between the orchestrators and the transport. [`HttpBackend`] speaks
//! the JSON contract over HTTP with `reqwest`; tests substitute a scripted implementation.
//!
//! Non-2xx statuses are uniformly failures. Bodies are decoded through
//! `serde_path_to_error` so a malformed response names the offending field.

use crate::constants::{ASSESS_PATH, CHAT_PATH, HEALTH_PATH, PATIENTS_PATH};
use crate::error::Operation;
use crate::{ClientConfig, ClientError, ClientResult};
use ng12_types::{
    AssessRequest, AssessmentResult, ChatHistory, ChatReply, ChatRequest, HealthStatus, Patient,
};
use ng12_uuid::SessionId;
use serde::de::DeserializeOwned;

/// Operations offered by the NG12 backend.
///
/// Implementations are used from a single logical thread; none of the futures are required
/// to be `Send`.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// `GET /patients`
    async fn list_patients(&self) -> ClientResult<Vec<Patient>>;

    /// `POST /assess`
    async fn assess(&self, request: &AssessRequest) -> ClientResult<AssessmentResult>;

    /// `POST /chat`
    async fn chat(&self, request: &ChatRequest) -> ClientResult<ChatReply>;

    /// `DELETE /chat/{session_id}`
    async fn clear_chat(&self, session_id: &SessionId) -> ClientResult<()>;

    /// `GET /chat/{session_id}/history`
    async fn chat_history(&self, session_id: &SessionId) -> ClientResult<ChatHistory>;

    /// `GET /health`
    async fn health(&self) -> ClientResult<HealthStatus>;
}

impl<B: Backend + ?Sized> Backend for &B {
    async fn list_patients(&self) -> ClientResult<Vec<Patient>> {
        (**self).list_patients().await
    }

    async fn assess(&self, request: &AssessRequest) -> ClientResult<AssessmentResult> {
        (**self).assess(request).await
    }

    async fn chat(&self, request: &ChatRequest) -> ClientResult<ChatReply> {
        (**self).chat(request).await
    }

    async fn clear_chat(&self, session_id: &SessionId) -> ClientResult<()> {
        (**self).clear_chat(session_id).await
    }

    async fn chat_history(&self, session_id: &SessionId) -> ClientResult<ChatHistory> {
        (**self).chat_history(session_id).await
    }

    async fn health(&self) -> ClientResult<HealthStatus> {
        (**self).health().await
    }
}

/// `reqwest`-backed implementation of [`Backend`].
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    cfg: ClientConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Builds the HTTP client from `cfg`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] if the TLS backend cannot be initialised.
    pub fn new(cfg: ClientConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { cfg, client })
    }

    async fn send(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| transport_error(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                "{} returned {}: {}",
                operation,
                status,
                body.chars().take(200).collect::<String>()
            );
            return Err(ClientError::Status {
                operation,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown Status").into(),
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        operation: Operation,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(operation, e))?;
        decode_body(operation, &body)
    }
}

fn transport_error(operation: Operation, err: reqwest::Error) -> ClientError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not connect to backend ({})", err)
    } else {
        err.to_string()
    };
    ClientError::Transport { operation, message }
}

/// Decodes a JSON body, reporting the path of the first mismatching field.
pub(crate) fn decode_body<T: DeserializeOwned>(operation: Operation, body: &[u8]) -> ClientResult<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        ClientError::Decode {
            operation,
            path,
            message: err.into_inner().to_string(),
        }
    })
}

impl Backend for HttpBackend {
    async fn list_patients(&self) -> ClientResult<Vec<Patient>> {
        let op = Operation::ListPatients;
        tracing::debug!("GET {}", PATIENTS_PATH);
        let response = self
            .send(op, self.client.get(self.cfg.endpoint(PATIENTS_PATH)))
            .await?;
        self.decode(op, response).await
    }

    async fn assess(&self, request: &AssessRequest) -> ClientResult<AssessmentResult> {
        let op = Operation::Assess;
        tracing::debug!("POST {} patient_id={}", ASSESS_PATH, request.patient_id);
        let response = self
            .send(op, self.client.post(self.cfg.endpoint(ASSESS_PATH)).json(request))
            .await?;
        self.decode(op, response).await
    }

    async fn chat(&self, request: &ChatRequest) -> ClientResult<ChatReply> {
        let op = Operation::Chat;
        tracing::debug!(
            "POST {} session_id={} top_k={}",
            CHAT_PATH,
            request.session_id,
            request.top_k
        );
        let response = self
            .send(op, self.client.post(self.cfg.endpoint(CHAT_PATH)).json(request))
            .await?;
        self.decode(op, response).await
    }

    async fn clear_chat(&self, session_id: &SessionId) -> ClientResult<()> {
        let op = Operation::ClearChat;
        let path = format!("{}/{}", CHAT_PATH, session_id);
        tracing::debug!("DELETE {}", path);
        // The body is informational only.
        self.send(op, self.client.delete(self.cfg.endpoint(&path)))
            .await?;
        Ok(())
    }

    async fn chat_history(&self, session_id: &SessionId) -> ClientResult<ChatHistory> {
        let op = Operation::ChatHistory;
        let path = format!("{}/{}/history", CHAT_PATH, session_id);
        tracing::debug!("GET {}", path);
        let response = self.send(op, self.client.get(self.cfg.endpoint(&path))).await?;
        self.decode(op, response).await
    }

    async fn health(&self) -> ClientResult<HealthStatus> {
        let op = Operation::Health;
        let response = self
            .send(op, self.client.get(self.cfg.endpoint(HEALTH_PATH)))
            .await?;
        self.decode(op, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path as AxumPath,
        http::StatusCode,
        response::Json,
        routing::{delete, get, post},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Seen {
        bodies: Arc<Mutex<Vec<Value>>>,
        deleted: Arc<Mutex<Vec<String>>>,
    }

    async fn serve(app: Router) -> HttpBackend {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let cfg = ClientConfig::new(&format!("http://{}", addr), None, 5).unwrap();
        HttpBackend::new(cfg).unwrap()
    }

    fn stub_router(seen: Seen) -> Router {
        let assess_seen = seen.clone();
        let chat_seen = seen.clone();
        let delete_seen = seen;

        Router::new()
            .route(
                "/patients",
                get(|| async {
                    Json(json!([{
                        "patient_id": "P1",
                        "name": "Jane Doe",
                        "age": 54,
                        "symptoms": ["cough", "weight loss"]
                    }]))
                }),
            )
            .route(
                "/assess",
                post(move |Json(body): Json<Value>| {
                    let seen = assess_seen.clone();
                    async move {
                        seen.bodies.lock().unwrap().push(body);
                        Json(json!({
                            "patient_id": "P1",
                            "patient_name": "Jane Doe",
                            "age": 54,
                            "symptoms": ["cough", "weight loss"],
                            "recommendation": "Urgent Referral",
                            "reasoning": "Persistent cough with weight loss.",
                            "citations": [{"source": "NG12", "page": 12, "excerpt": "...", "chunk_id": "c1"}]
                        }))
                    }
                }),
            )
            .route(
                "/chat",
                post(move |Json(body): Json<Value>| {
                    let seen = chat_seen.clone();
                    async move {
                        let session = body["session_id"].clone();
                        seen.bodies.lock().unwrap().push(body);
                        Json(json!({"session_id": session, "answer": "Hemoptysis.", "citations": []}))
                    }
                }),
            )
            .route(
                "/chat/:session_id",
                delete(move |AxumPath(id): AxumPath<String>| {
                    let seen = delete_seen.clone();
                    async move {
                        seen.deleted.lock().unwrap().push(id.clone());
                        Json(json!({"status": "success", "message": format!("Session {} cleared", id)}))
                    }
                }),
            )
            .route(
                "/chat/:session_id/history",
                get(|AxumPath(id): AxumPath<String>| async move {
                    Json(json!({
                        "session_id": id,
                        "messages": [
                            {"role": "user", "content": "hello", "citations": null},
                            {"role": "assistant", "content": "hi", "citations": []}
                        ]
                    }))
                }),
            )
            .route(
                "/health",
                get(|| async { Json(json!({"status": "ok", "service": "NG12 Cancer Risk Assessor"})) }),
            )
    }

    #[tokio::test]
    async fn lists_patients_from_backend() {
        let backend = serve(stub_router(Seen::default())).await;
        let patients = backend.list_patients().await.unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].patient_id, "P1");
        assert_eq!(patients[0].symptoms, vec!["cough", "weight loss"]);
    }

    #[tokio::test]
    async fn assess_posts_patient_id() {
        let seen = Seen::default();
        let backend = serve(stub_router(seen.clone())).await;

        let result = backend
            .assess(&AssessRequest {
                patient_id: "P1".into(),
            })
            .await
            .unwrap();

        assert_eq!(result.recommendation, ng12_types::Recommendation::UrgentReferral);
        assert_eq!(result.citations[0].page, 12);
        assert_eq!(seen.bodies.lock().unwrap()[0], json!({"patient_id": "P1"}));
    }

    #[tokio::test]
    async fn chat_sends_session_message_and_top_k() {
        let seen = Seen::default();
        let backend = serve(stub_router(seen.clone())).await;
        let session = SessionId::generate();

        let reply = backend
            .chat(&ChatRequest {
                session_id: session.to_string(),
                message: "What are red-flag symptoms?".into(),
                top_k: 5,
            })
            .await
            .unwrap();

        assert_eq!(reply.answer, "Hemoptysis.");
        assert_eq!(reply.session_id.as_deref(), Some(session.to_string().as_str()));
        assert_eq!(
            seen.bodies.lock().unwrap()[0],
            json!({"session_id": session.to_string(), "message": "What are red-flag symptoms?", "top_k": 5})
        );
    }

    #[tokio::test]
    async fn clear_and_history_are_scoped_to_session() {
        let seen = Seen::default();
        let backend = serve(stub_router(seen.clone())).await;
        let session = SessionId::generate();

        backend.clear_chat(&session).await.unwrap();
        assert_eq!(seen.deleted.lock().unwrap().as_slice(), [session.to_string()]);

        let history = backend.chat_history(&session).await.unwrap();
        assert_eq!(history.session_id, session.to_string());
        assert_eq!(history.messages.len(), 2);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let backend = serve(stub_router(Seen::default())).await;
        assert!(backend.health().await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn non_2xx_is_a_status_error() {
        let app = Router::new().route(
            "/assess",
            post(|| async { (StatusCode::NOT_FOUND, "Patient not found: P9") }),
        );
        let backend = serve(app).await;

        let err = backend
            .assess(&AssessRequest {
                patient_id: "P9".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Assessment failed: 404 Not Found");
    }

    #[tokio::test]
    async fn malformed_body_names_failing_field() {
        let app = Router::new().route(
            "/patients",
            get(|| async { Json(json!([{"patient_id": "P1", "name": "Jane", "age": "old"}])) }),
        );
        let backend = serve(app).await;

        let err = backend.list_patients().await.unwrap_err();
        match err {
            ClientError::Decode { path, .. } => assert_eq!(path, "[0].age"),
            other => panic!("expected Decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let cfg = ClientConfig::new(&format!("http://{}", addr), None, 5).unwrap();
        let backend = HttpBackend::new(cfg).unwrap();

        let err = backend.list_patients().await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Network);
        assert!(err.status().is_none());
    }

    #[test]
    fn decode_body_reports_root_for_wrong_top_level_type() {
        let err = decode_body::<Vec<Patient>>(Operation::ListPatients, b"{}").unwrap_err();
        match err {
            ClientError::Decode { path, .. } => assert_eq!(path, "<root>"),
            other => panic!("expected Decode error, got {other:?}"),
        }
    }
}
