//! Co-pilot chat: a running conversation with the inventory assistant.

use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use super::{lock, SubmitFlag, ViewError};
use crate::models::{ChatMessage, ChatRequest, ChatRole};
use crate::remote::InventoryRemote;

pub const GREETING: &str = "Hello! I'm your VoltStock Co-Pilot. I can help you analyze inventory data, generate reports, simulate scenarios, and manage orders. How can I assist you today?";

pub const APOLOGY: &str =
    "Sorry, there was an error processing your request. Please try again later.";

/// Suggestions offered while the conversation holds only the greeting.
pub const EXAMPLE_PROMPTS: [&str; 4] = [
    "Summarize last week's outbound inventory.",
    "Create a low stock report for the electronics category.",
    "Simulate the impact of a 15% sales increase on current stock.",
    "Find all orders from customer 'Acme Corp' and mark as priority.",
];

#[derive(Debug)]
struct Conversation {
    messages: Vec<ChatMessage>,
    id: Option<String>,
}

pub struct CopilotView {
    remote: Arc<dyn InventoryRemote>,
    conversation: Mutex<Conversation>,
    sending: SubmitFlag,
}

impl CopilotView {
    pub fn new(remote: Arc<dyn InventoryRemote>) -> Self {
        Self {
            remote,
            conversation: Mutex::new(Conversation {
                messages: vec![ChatMessage {
                    role: ChatRole::Model,
                    content: GREETING.to_string(),
                }],
                id: None,
            }),
            sending: SubmitFlag::default(),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        lock(&self.conversation).messages.clone()
    }

    pub fn conversation_id(&self) -> Option<String> {
        lock(&self.conversation).id.clone()
    }

    pub fn show_examples(&self) -> bool {
        lock(&self.conversation).messages.len() <= 1
    }

    pub fn is_sending(&self) -> bool {
        self.sending.is_set()
    }

    /// Post `input` with the whole history and append the assistant's answer.
    /// A failed call appends an apology instead of returning an error; blank
    /// input is ignored and returns `Ok(None)`.
    pub async fn send(&self, input: &str) -> Result<Option<ChatMessage>, ViewError> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        let _sending = self.sending.try_start()?;
        let request = {
            let mut conversation = lock(&self.conversation);
            conversation.messages.push(ChatMessage {
                role: ChatRole::User,
                content: input.to_string(),
            });
            ChatRequest {
                messages: conversation.messages.clone(),
                conversation_id: conversation.id.clone(),
            }
        };
        debug!(turns = request.messages.len(), "sending chat request");

        let reply = match self.remote.chat(&request).await {
            Ok(reply) => {
                let mut conversation = lock(&self.conversation);
                if reply.conversation_id.is_some() {
                    conversation.id = reply.conversation_id;
                }
                ChatMessage {
                    role: ChatRole::Model,
                    content: reply.content,
                }
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                ChatMessage {
                    role: ChatRole::Model,
                    content: APOLOGY.to_string(),
                }
            }
        };
        lock(&self.conversation).messages.push(reply.clone());
        Ok(Some(reply))
    }
}
