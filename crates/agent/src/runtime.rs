use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Conversation events returned to the runtime. The rental actions never set slots,
/// so they always return an empty list.
pub type Event = Value;

/// Domain definition forwarded by the runtime. Accepted and ignored.
pub type Domain = Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub intent: Option<IntentRef>,
}

/// Conversation state as seen by an action: who is talking and what they said last.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub latest_message: LatestMessage,
}

impl Tracker {
    pub fn from_text(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            latest_message: LatestMessage { text: Some(text.into()), intent: None },
        }
    }

    /// Lowercased text of the latest user message, empty when absent.
    pub fn latest_utterance(&self) -> String {
        self.latest_message.text.as_deref().unwrap_or_default().to_lowercase()
    }

    pub fn intent_name(&self) -> Option<&str> {
        self.latest_message.intent.as_ref().and_then(|intent| intent.name.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMessage {
    pub text: String,
}

/// Output channel handed to actions; collects the messages to send back.
#[derive(Debug, Default)]
pub struct CollectingDispatcher {
    messages: Vec<BotMessage>,
}

impl CollectingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn utter_message(&mut self, text: impl Into<String>) {
        self.messages.push(BotMessage { text: text.into() });
    }

    pub fn messages(&self) -> &[BotMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<BotMessage> {
        self.messages
    }
}
