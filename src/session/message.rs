//! Chat messages.

use serde::{Deserialize, Serialize};

use crate::factcheck::FactCheckResult;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// Message body: free text or a structured verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MessageContent {
    /// Plain text (user claims, error notices).
    Text(String),
    /// Parsed backend response.
    FactCheck(FactCheckResult),
}

/// One turn in a session. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// A user-authored text message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A bot text message (used for error notices).
    #[must_use]
    pub fn bot_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A bot message carrying a fact-check verdict.
    #[must_use]
    pub fn bot_result(result: FactCheckResult) -> Self {
        Self {
            role: Role::Bot,
            content: MessageContent::FactCheck(result),
        }
    }

    /// Text placed on the clipboard by the copy button.
    #[must_use]
    pub fn copy_text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::FactCheck(fc) => {
                format!("Claim: {}\nSummary: {}", fc.claim, fc.summary)
            }
        }
    }

    /// The fact-check result, if this message carries one.
    #[must_use]
    pub fn fact_check(&self) -> Option<&FactCheckResult> {
        match &self.content {
            MessageContent::FactCheck(fc) => Some(fc),
            MessageContent::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_text() {
        assert_eq!(Message::user("hello").copy_text(), "hello");

        let result = FactCheckResult {
            claim: "Is the earth flat?".to_string(),
            summary: "No".to_string(),
            ..Default::default()
        };
        assert_eq!(
            Message::bot_result(result).copy_text(),
            "Claim: Is the earth flat?\nSummary: No"
        );
    }

    #[test]
    fn test_content_is_tagged() {
        let json = serde_json::to_value(Message::bot_text("oops")).unwrap();
        assert_eq!(json["role"], "bot");
        assert_eq!(json["content"]["kind"], "text");
        assert_eq!(json["content"]["value"], "oops");
    }
}
