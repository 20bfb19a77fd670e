//! The chat turn driver.
//!
//! [`ChatTurn`] runs one user turn end to end: it records the user message,
//! opens the reply stream, renders the assistant bubble as it grows and
//! keeps the sidebar [`ThreadList`] current. A failed turn keeps whatever
//! partial reply arrived and appends [`FALLBACK_REPLY`].

use futures::{Stream, StreamExt};
use mutumwa_core::{
    thread_title, ChatMessage, Conversation, Domain, Language, MessageId, Sender, ThreadList, UserId,
};
use mutumwa_streaming::{AssembledMessage, MessageUpdate, ReplyStream, StreamResult};

use crate::client::ReplySource;
use crate::error::{WebhookError, WebhookResult};
use crate::request::TurnRequest;

/// Assistant message appended when a turn fails.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process your message. Please try again.";

/// How a turn ended.
#[derive(Debug)]
pub enum TurnStatus {
    /// The message was blank; nothing was sent.
    Skipped,
    /// The reply stream ran to completion.
    Completed,
    /// The request or the reply stream failed.
    Failed(WebhookError),
}

/// Result of [`ChatTurn::send`].
#[derive(Debug)]
pub struct TurnOutcome {
    /// How the turn ended.
    pub status: TurnStatus,
    /// ID of the user message, unless skipped.
    pub user_message: Option<MessageId>,
    /// The assistant reply as assembled, if any content arrived.
    pub reply: Option<AssembledMessage>,
    /// ID of the fallback message, if one was appended.
    pub fallback: Option<MessageId>,
}

impl TurnOutcome {
    fn skipped() -> Self {
        Self {
            status: TurnStatus::Skipped,
            user_message: None,
            reply: None,
            fallback: None,
        }
    }

    /// Check if the reply stream ran to completion.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.status, TurnStatus::Completed)
    }

    /// The failure, if the turn failed.
    #[must_use]
    pub fn error(&self) -> Option<&WebhookError> {
        match &self.status {
            TurnStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Text of the assembled reply.
    #[must_use]
    pub fn reply_text(&self) -> Option<&str> {
        self.reply.as_ref().map(|m| m.text.as_str())
    }
}

/// Apply one update to the transcript.
///
/// `Created` appends an empty assistant bubble with the update's ID and
/// `Updated` replaces its text.
pub fn apply_update(conversation: &mut Conversation, update: &MessageUpdate) -> WebhookResult<()> {
    match update {
        MessageUpdate::Created { id } => {
            conversation.push(ChatMessage::with_id(id.clone(), Sender::Assistant, ""));
        }
        MessageUpdate::Updated { id, text } => conversation.set_text(id, text.clone())?,
        MessageUpdate::Finalized { .. } => {}
    }
    Ok(())
}

/// Drain a reply stream into a conversation.
///
/// `render` sees every update after it has been applied. On a transport
/// failure the updates applied so far stay in the conversation.
pub async fn apply_reply<S, F>(
    stream: ReplyStream<S>,
    conversation: &mut Conversation,
    mut render: F,
) -> WebhookResult<Option<AssembledMessage>>
where
    ReplyStream<S>: Stream<Item = StreamResult<MessageUpdate>>,
    F: FnMut(&MessageUpdate, &Conversation),
{
    let mut stream = std::pin::pin!(stream);
    while let Some(update) = stream.next().await {
        let update = update?;
        apply_update(conversation, &update)?;
        render(&update, conversation);
    }
    Ok(stream.message().cloned())
}

/// Sends turns for one user to one domain.
#[derive(Debug, Clone)]
pub struct ChatTurn<R> {
    source: R,
    domain: Domain,
    language: Language,
    user_id: UserId,
}

impl<R: ReplySource> ChatTurn<R> {
    /// Create a driver that replies in the default language.
    pub fn new(source: R, domain: Domain, user_id: UserId) -> Self {
        Self {
            source,
            domain,
            language: Language::default(),
            user_id,
        }
    }

    /// Set the reply language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Switch to another domain for later turns.
    pub fn set_domain(&mut self, domain: Domain) {
        self.domain = domain;
    }

    /// Switch the reply language for later turns.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// The current domain.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The current reply language.
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// The user turns are sent for.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The reply source.
    pub fn source(&self) -> &R {
        &self.source
    }

    /// Send one message and stream the reply into `conversation`.
    ///
    /// A blank message is skipped. The first message of a conversation names
    /// its thread and becomes its preview; after that only non-empty replies
    /// update the preview. `on_update` is called after each update has been
    /// applied to the conversation.
    pub async fn send<F>(
        &self,
        conversation: &mut Conversation,
        threads: &mut ThreadList,
        text: &str,
        mut on_update: F,
    ) -> TurnOutcome
    where
        F: FnMut(&MessageUpdate, &Conversation),
    {
        let session_id = conversation.session_id().clone();
        let Some(request) = TurnRequest::new(
            text,
            self.language.clone(),
            session_id.clone(),
            self.user_id.clone(),
        ) else {
            tracing::debug!(session_id = %session_id, "blank message skipped");
            return TurnOutcome::skipped();
        };

        let first = conversation.is_empty();
        let user = ChatMessage::user(text);
        let user_id = user.id.clone();
        conversation.push(user);

        if first {
            threads.touch(&session_id, Some(thread_title(text).as_str()), text);
        }

        tracing::info!(
            session_id = %session_id,
            domain = %self.domain.value,
            first,
            "turn started"
        );

        let result = match self.source.open(&self.domain, &request).await {
            Ok(stream) => apply_reply(stream, conversation, &mut on_update).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(reply) => {
                if let Some(message) = reply.as_ref().filter(|m| !m.text.is_empty()) {
                    threads.touch(&session_id, None, &message.text);
                }
                tracing::info!(
                    session_id = %session_id,
                    reply_chars = reply.as_ref().map_or(0, |m| m.text.chars().count()),
                    "turn completed"
                );
                TurnOutcome {
                    status: TurnStatus::Completed,
                    user_message: Some(user_id),
                    reply,
                    fallback: None,
                }
            }
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "turn failed");
                let reply = conversation
                    .last()
                    .filter(|m| !m.is_user())
                    .map(|m| AssembledMessage {
                        id: m.id.clone(),
                        text: m.text.clone(),
                        is_final: false,
                    });

                let fallback = ChatMessage::assistant(FALLBACK_REPLY);
                let fallback_id = fallback.id.clone();
                conversation.push(fallback);

                TurnOutcome {
                    status: TurnStatus::Failed(e),
                    user_message: Some(user_id),
                    reply,
                    fallback: Some(fallback_id),
                }
            }
        }
    }
}
