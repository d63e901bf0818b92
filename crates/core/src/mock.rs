//! Scripted [`Backend`] for orchestrator tests.
//!
//! Each operation pops the next scripted reply; an unscripted call fails with a transport
//! error so a test never hangs by accident. Every request is recorded.

use crate::error::Operation;
use crate::{Backend, ClientError, ClientResult};
use ng12_types::{
    AssessRequest, AssessmentResult, ChatHistory, ChatReply, ChatRequest, HealthStatus, Patient,
};
use ng12_uuid::SessionId;
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) enum Reply<T> {
    Ready(ClientResult<T>),
    /// Never completes.
    Hang,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ListPatients,
    Assess(AssessRequest),
    Chat(ChatRequest),
    ClearChat(String),
    ChatHistory(String),
    Health,
}

#[derive(Default)]
pub(crate) struct ScriptedBackend {
    patients: Mutex<VecDeque<Reply<Vec<Patient>>>>,
    assessments: Mutex<VecDeque<Reply<AssessmentResult>>>,
    chats: Mutex<VecDeque<Reply<ChatReply>>>,
    clears: Mutex<VecDeque<Reply<()>>>,
    histories: Mutex<VecDeque<Reply<ChatHistory>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(self, reply: ClientResult<Vec<Patient>>) -> Self {
        self.patients.lock().unwrap().push_back(Reply::Ready(reply));
        self
    }

    pub fn with_assessment(self, reply: ClientResult<AssessmentResult>) -> Self {
        self.assessments.lock().unwrap().push_back(Reply::Ready(reply));
        self
    }

    pub fn with_hanging_assessment(self) -> Self {
        self.assessments.lock().unwrap().push_back(Reply::Hang);
        self
    }

    pub fn with_chat(self, reply: ClientResult<ChatReply>) -> Self {
        self.chats.lock().unwrap().push_back(Reply::Ready(reply));
        self
    }

    pub fn with_hanging_chat(self) -> Self {
        self.chats.lock().unwrap().push_back(Reply::Hang);
        self
    }

    pub fn with_clear(self, reply: ClientResult<()>) -> Self {
        self.clears.lock().unwrap().push_back(Reply::Ready(reply));
        self
    }

    pub fn with_history(self, reply: ClientResult<ChatHistory>) -> Self {
        self.histories.lock().unwrap().push_back(Reply::Ready(reply));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn next<T>(queue: &Mutex<VecDeque<Reply<T>>>, operation: Operation) -> ClientResult<T> {
        let reply = queue.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(ClientError::Transport {
                operation,
                message: "no scripted reply".into(),
            }),
        }
    }
}

impl Backend for ScriptedBackend {
    async fn list_patients(&self) -> ClientResult<Vec<Patient>> {
        self.record(Call::ListPatients);
        Self::next(&self.patients, Operation::ListPatients).await
    }

    async fn assess(&self, request: &AssessRequest) -> ClientResult<AssessmentResult> {
        self.record(Call::Assess(request.clone()));
        Self::next(&self.assessments, Operation::Assess).await
    }

    async fn chat(&self, request: &ChatRequest) -> ClientResult<ChatReply> {
        self.record(Call::Chat(request.clone()));
        Self::next(&self.chats, Operation::Chat).await
    }

    async fn clear_chat(&self, session_id: &SessionId) -> ClientResult<()> {
        self.record(Call::ClearChat(session_id.to_string()));
        Self::next(&self.clears, Operation::ClearChat).await
    }

    async fn chat_history(&self, session_id: &SessionId) -> ClientResult<ChatHistory> {
        self.record(Call::ChatHistory(session_id.to_string()));
        Self::next(&self.histories, Operation::ChatHistory).await
    }

    async fn health(&self) -> ClientResult<HealthStatus> {
        self.record(Call::Health);
        Ok(HealthStatus {
            status: "ok".into(),
            service: None,
        })
    }
}

pub(crate) fn patient(id: &str, name: &str) -> Patient {
    Patient {
        patient_id: id.into(),
        name: name.into(),
        age: 54,
        symptoms: vec!["cough".into(), "weight loss".into()],
    }
}

pub(crate) fn assessment(id: &str, recommendation: &str) -> AssessmentResult {
    AssessmentResult {
        patient_id: id.into(),
        patient_name: "Jane Doe".into(),
        age: 54,
        symptoms: vec!["cough".into(), "weight loss".into()],
        recommendation: recommendation.into(),
        reasoning: "Persistent cough with unexplained weight loss.".into(),
        citations: vec![ng12_types::Citation {
            source: "NG12".into(),
            page: 12,
            excerpt: "Offer an urgent chest X-ray...".into(),
            chunk_id: "c1".into(),
        }],
    }
}

pub(crate) fn server_error(operation: Operation) -> ClientError {
    ClientError::Status {
        operation,
        status: 500,
        reason: "Internal Server Error".into(),
    }
}
