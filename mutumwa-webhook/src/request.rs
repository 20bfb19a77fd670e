//! The turn request sent to a webhook.

use mutumwa_core::{Language, SessionId, UserId};
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

/// Form field carrying the user's message.
pub const FIELD_TEXT: &str = "text";
/// Form field carrying the reply language.
pub const FIELD_TARGET_LANGUAGE: &str = "targetLanguage";
/// Form field carrying the session ID.
pub const FIELD_SESSION_ID: &str = "sessionId";
/// Form field carrying the user ID.
pub const FIELD_USER_ID: &str = "userId";

/// One user turn, posted as a multipart form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    /// The message text, as typed.
    pub text: String,
    /// Language the reply should be in.
    pub target_language: Language,
    /// Conversation the turn belongs to.
    pub session_id: SessionId,
    /// Who is asking.
    pub user_id: UserId,
}

impl TurnRequest {
    /// Create a request. Returns `None` for a blank message.
    pub fn new(
        text: impl Into<String>,
        target_language: Language,
        session_id: SessionId,
        user_id: UserId,
    ) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            text,
            target_language,
            session_id,
            user_id,
        })
    }

    /// Form fields in the order they are sent.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            (FIELD_TEXT, self.text.as_str()),
            (FIELD_TARGET_LANGUAGE, self.target_language.as_str()),
            (FIELD_SESSION_ID, self.session_id.as_str()),
            (FIELD_USER_ID, self.user_id.as_str()),
        ]
    }

    /// Build the multipart body.
    #[must_use]
    pub fn to_form(&self) -> Form {
        self.fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name, value.to_string())
            })
    }
}
