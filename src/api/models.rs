use serde::{Deserialize, Serialize};

pub const NO_MESSAGES: &str = "Sem mensagens";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Clinic,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub timestamp: String,
    pub sender: Sender,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(alias = "contactName")]
    pub name: String,
    #[serde(default)]
    pub reviewed: bool,
    /// Chronological: the backend appends, the client never reorders.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text shown under the contact name in the conversation list.
    pub fn preview(&self) -> &str {
        self.last_message().map(|m| m.content.as_str()).unwrap_or(NO_MESSAGES)
    }

    /// One-way: a reviewed conversation never becomes unreviewed locally.
    pub fn mark_reviewed(&mut self) {
        self.reviewed = true;
    }

    fn count_from(&self, sender: Sender) -> u64 {
        self.messages.iter().filter(|m| m.sender == sender).count() as u64
    }
}

/// Counters shown on the dashboard cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(rename = "totalRecebidas", default)]
    pub received: u64,
    #[serde(rename = "totalEnviadas", default)]
    pub sent: u64,
    /// Percentage, 0-100.
    #[serde(rename = "taxaResposta", default)]
    pub response_rate: f64,
    #[serde(rename = "pendentes", default)]
    pub pending_review: u64,
}

impl Metrics {
    pub fn from_conversations(conversations: &[Conversation]) -> Self {
        let received: u64 = conversations.iter().map(|c| c.count_from(Sender::User)).sum();
        let sent: u64 = conversations.iter().map(|c| c.count_from(Sender::Clinic)).sum();
        let response_rate = if received == 0 {
            0.0
        } else {
            (sent as f64 / received as f64 * 100.0).round()
        };
        let pending_review = conversations.iter().filter(|c| !c.reviewed).count() as u64;
        Self { received, sent, response_rate, pending_review }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

/// `getAllMessages` answers either with a bare list or with metrics attached.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AllMessagesPayload {
    List(Vec<Conversation>),
    Overview(Overview),
}

impl From<AllMessagesPayload> for Overview {
    fn from(payload: AllMessagesPayload) -> Self {
        match payload {
            AllMessagesPayload::List(conversations) => Overview {
                metrics: Metrics::from_conversations(&conversations),
                conversations,
            },
            AllMessagesPayload::Overview(overview) => overview,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SystemStateRequest {
    pub state: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    pub access_token: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RegisterResponse {
    pub user: Option<UserProfile>,
    pub error: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn msg(id: &str, sender: Sender) -> Message {
        Message { id: id.into(), content: format!("m{id}"), timestamp: "10:00".into(), sender }
    }

    #[test]
    fn conversation_accepts_contact_name_and_missing_fields() {
        let conv: Conversation =
            serde_json::from_value(json!({"id": "7", "contactName": "Maria"})).unwrap();
        assert_eq!(conv.name, "Maria");
        assert!(!conv.reviewed);
        assert_eq!(conv.preview(), NO_MESSAGES);
    }

    #[test]
    fn preview_is_last_message() {
        let conv = Conversation {
            id: "1".into(),
            name: "Ana".into(),
            reviewed: false,
            messages: vec![msg("1", Sender::User), msg("2", Sender::Clinic)],
        };
        assert_eq!(conv.preview(), "m2");
    }

    #[test]
    fn overview_payload_keeps_backend_metrics() {
        let payload: AllMessagesPayload = serde_json::from_value(json!({
            "metrics": {"totalRecebidas": 40, "totalEnviadas": 35, "taxaResposta": 87.5, "pendentes": 3},
            "conversations": []
        }))
        .unwrap();
        let overview = Overview::from(payload);
        assert_eq!(overview.metrics.received, 40);
        assert_eq!(overview.metrics.pending_review, 3);
    }

    #[test]
    fn bare_list_derives_metrics() {
        let payload: AllMessagesPayload = serde_json::from_value(json!([
            {"id": "1", "name": "Ana", "reviewed": false, "messages": [
                {"id": "a", "content": "oi", "timestamp": "t", "sender": "user"},
                {"id": "b", "content": "olá", "timestamp": "t", "sender": "clinic"},
                {"id": "c", "content": "?", "timestamp": "t", "sender": "user"}
            ]},
            {"id": "2", "name": "Bia", "reviewed": true, "messages": [
                {"id": "d", "content": "ok", "timestamp": "t", "sender": "system"}
            ]}
        ]))
        .unwrap();
        let overview = Overview::from(payload);
        assert_eq!(overview.conversations.len(), 2);
        assert_eq!(overview.metrics.received, 2);
        assert_eq!(overview.metrics.sent, 1);
        assert_eq!(overview.metrics.response_rate, 50.0);
        assert_eq!(overview.metrics.pending_review, 1);
    }

    #[test]
    fn mark_reviewed_is_one_way() {
        let mut conv = Conversation { id: "1".into(), name: "Ana".into(), reviewed: false, messages: vec![] };
        conv.mark_reviewed();
        conv.mark_reviewed();
        assert!(conv.reviewed);
    }
}
