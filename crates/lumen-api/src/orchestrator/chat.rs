use chrono::{DateTime, Utc};
use lumen_persist::{Conversation, ConversationUpdate, Message, NewConversation, NewMessage};
use lumen_types::{truncate_with_marker, Source};
use serde::Serialize;

use super::{Orchestrator, PREVIEW_BUDGET, TITLE_BUDGET};
use crate::error::{ApiError, ApiResult};

/// Upper bound on conversations scanned when filtering search hits by owner
const SEARCH_SCAN_LIMIT: usize = 500;

/// A conversation with its ordered messages
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Thread {
    fn new(conversation: Conversation, messages: Vec<Message>) -> Self {
        Self {
            id: conversation.id,
            title: conversation.title,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
            messages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub id: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_message_preview: Option<String>,
    pub message_count: usize,
}

/// Result of one chat turn
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub thread_id: String,
    pub response: String,
    pub sources: Vec<Source>,
    pub thread: Thread,
}

/// Thread title from its opening message, verbatim when it fits
pub fn derive_title(message: &str) -> String {
    truncate_with_marker(message, TITLE_BUDGET)
}

/// Listing preview of a message body
pub fn preview(content: &str) -> String {
    truncate_with_marker(content, PREVIEW_BUDGET)
}

fn is_listed_for(conversation: &Conversation, caller: Option<&str>) -> bool {
    conversation.user_id.as_deref() == caller
}

impl Orchestrator {
    /// Run one chat turn: store the question, answer it, store the answer
    ///
    /// The turn runs on its own task so that a dropped request does not cancel
    /// persistence half way.
    pub async fn post_chat_message(
        &self,
        message: String,
        thread_id: Option<String>,
        caller: Option<String>,
    ) -> ApiResult<ChatTurn> {
        if message.trim().is_empty() {
            return Err(ApiError::BadRequest("Message is required".to_string()));
        }

        let this = self.clone();
        tokio::spawn(async move { this.run_chat_turn(message, thread_id, caller).await })
            .await
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("chat turn task failed: {}", e)))?
    }

    async fn run_chat_turn(
        &self,
        message: String,
        thread_id: Option<String>,
        caller: Option<String>,
    ) -> ApiResult<ChatTurn> {
        let caller = caller.as_deref();
        let conversation = match thread_id.as_deref().filter(|id| !id.trim().is_empty()) {
            Some(id) => self.visible_conversation(id, caller).await?,
            None => {
                let conversation = self
                    .store
                    .create_conversation(NewConversation {
                        user_id: caller.map(str::to_string),
                        title: Some(derive_title(&message)),
                        summary: None,
                    })
                    .await?;
                tracing::info!(thread_id = %conversation.id, "Thread created");
                conversation
            }
        };
        let thread_id = conversation.id.clone();

        let question = self
            .store
            .create_message(NewMessage::user(&thread_id, &message))
            .await?;

        tracing::debug!(thread_id = %thread_id, state = "awaiting_answer", "Chat turn dispatched");
        let answer = self.gateway.generate_answer(&message, None).await;

        // The answer is returned even if storing it fails
        let reply = match self
            .store
            .create_message(NewMessage::assistant(&thread_id, &answer.content, answer.sources.clone()))
            .await
        {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::error!(thread_id = %thread_id, error = %e, "Failed to store assistant message; thread is missing this answer");
                None
            }
        };

        let conversation = match self
            .store
            .update_conversation(&thread_id, ConversationUpdate::touch())
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!(thread_id = %thread_id, error = %e, "Failed to refresh thread timestamp");
                conversation
            }
        };

        let messages = match self.store.get_messages(&thread_id).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(thread_id = %thread_id, error = %e, "Failed to reload thread messages");
                std::iter::once(question).chain(reply).collect()
            }
        };

        tracing::debug!(thread_id = %thread_id, state = "persisted", messages = messages.len(), "Chat turn complete");

        Ok(ChatTurn {
            thread_id,
            response: answer.content,
            sources: answer.sources,
            thread: Thread::new(conversation, messages),
        })
    }

    /// Look up a conversation the caller may see
    async fn visible_conversation(&self, id: &str, caller: Option<&str>) -> ApiResult<Conversation> {
        let conversation = self
            .store
            .get_conversation(id)
            .await?
            .ok_or_else(ApiError::thread_not_found)?;
        if !conversation.is_visible_to(caller) {
            return Err(ApiError::thread_forbidden());
        }
        Ok(conversation)
    }

    pub async fn get_thread(&self, id: &str, caller: Option<&str>) -> ApiResult<Thread> {
        let conversation = self.visible_conversation(id, caller).await?;
        let messages = self.store.get_messages(id).await?;
        Ok(Thread::new(conversation, messages))
    }

    /// Remove a thread's messages, then the thread
    pub async fn delete_thread(&self, id: &str, caller: Option<&str>) -> ApiResult<()> {
        self.visible_conversation(id, caller).await?;

        let removed = self.store.delete_messages(id).await?;
        if !self.store.delete_conversation(id).await? {
            return Err(ApiError::thread_not_found());
        }

        tracing::info!(thread_id = %id, messages = removed, "Thread deleted");
        Ok(())
    }

    /// Recent threads for the caller; empty when the store is unavailable
    pub async fn list_threads(&self, limit: usize, caller: Option<&str>) -> Vec<ThreadSummary> {
        let conversations = match caller {
            Some(user) => self.store.list_conversations_by_user(user, limit).await,
            None => self.store.list_recent_conversations(limit).await,
        };

        match conversations {
            Ok(conversations) => self.summarize(conversations).await,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list threads");
                Vec::new()
            }
        }
    }

    /// Threads whose title or summary contains `text`
    pub async fn search_threads(&self, text: &str, limit: usize, caller: Option<&str>) -> Vec<ThreadSummary> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        match self.store.search_conversations(text, SEARCH_SCAN_LIMIT.max(limit)).await {
            Ok(hits) => {
                let visible = hits
                    .into_iter()
                    .filter(|c| is_listed_for(c, caller))
                    .take(limit)
                    .collect();
                self.summarize(visible).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to search threads");
                Vec::new()
            }
        }
    }

    async fn summarize(&self, conversations: Vec<Conversation>) -> Vec<ThreadSummary> {
        let mut summaries = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let messages = match self.store.get_messages(&conversation.id).await {
                Ok(messages) => messages,
                Err(e) => {
                    tracing::warn!(thread_id = %conversation.id, error = %e, "Failed to load thread messages");
                    return Vec::new();
                }
            };
            summaries.push(ThreadSummary {
                last_message_preview: messages.last().map(|m| preview(&m.content)),
                message_count: messages.len(),
                id: conversation.id,
                title: conversation.title,
                created_at: conversation.created_at,
                updated_at: conversation.updated_at,
            });
        }
        summaries
    }
}
