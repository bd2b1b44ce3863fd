//! Validation and message composition for the contact form relay.
//!
//! The mail transport itself lives outside this crate; this module only
//! decides what gets sent and which status the endpoint answers with.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContactError {
    #[error("Name is required.")]
    MissingName,
    #[error("Message is required.")]
    MissingMessage,
    #[error("Failed to send message.")]
    SendFailed,
}

impl ContactError {
    pub fn status(self) -> u16 {
        match self {
            ContactError::MissingName | ContactError::MissingMessage => 400,
            ContactError::SendFailed => 500,
        }
    }

    /// `{"error": "..."}` response body.
    pub fn body(self) -> String {
        format!("{{\"error\":\"{}\"}}", self)
    }
}

pub const SUCCESS_BODY: &str = "{\"ok\":true}";

/// Raw form fields as posted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Request metadata appended to the mail body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SenderInfo {
    pub forwarded_for: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub subject: String,
    pub message: String,
}

fn trimmed(field: &Option<String>) -> &str {
    field.as_deref().map(str::trim).unwrap_or("")
}

impl ContactForm {
    pub fn validate(&self) -> Result<ContactMessage, ContactError> {
        let name = trimmed(&self.name);
        let message = trimmed(&self.message);
        if name.is_empty() {
            return Err(ContactError::MissingName);
        }
        if message.is_empty() {
            return Err(ContactError::MissingMessage);
        }
        let subject = match trimmed(&self.subject) {
            "" => format!("New message from {name}"),
            s => s.to_string(),
        };
        Ok(ContactMessage {
            name: name.to_string(),
            subject,
            message: message.to_string(),
        })
    }
}

impl ContactMessage {
    /// Plain-text mail body; `sent_at` is a preformatted local timestamp.
    pub fn text_body(&self, sent_at: &str, sender: &SenderInfo) -> String {
        let ip = sender.forwarded_for.as_deref().unwrap_or("unknown");
        let ua = sender.user_agent.as_deref().unwrap_or("unknown");
        let lines = [
            "You received a new message from your portfolio:".to_string(),
            String::new(),
            format!("Name: {}", self.name),
            format!("Subject: {}", self.subject),
            format!("Time: {sent_at}"),
            String::new(),
            "Message:".to_string(),
            self.message.clone(),
            String::new(),
            "---".to_string(),
            format!("Sender IP (approx): {ip}"),
            format!("UA: {ua}"),
        ];
        lines.join("\n")
    }
}
