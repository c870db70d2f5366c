//! Messaging-service facade for chatsweep
//!
//! This module defines the `ChatService` trait that the shell talks to,
//! plus the HTTP implementation. The facade translates shell intents into
//! service calls; it carries no business logic beyond delegation and
//! simple result shaping.

pub mod http;
pub mod types;

pub use http::HttpChatService;
pub use types::{Chat, Message, User};

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Facade over the remote messaging service
///
/// All operations are suspension points awaiting a remote response, and all
/// propagate service errors (network, auth, rate limiting) to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Username of the authenticated account
    async fn whoami(&self) -> Result<String>;

    /// Resolve a chat display name to its identifier
    ///
    /// Lists all dialogs for the account and linear-scans for the first
    /// exact (case-sensitive) name match.
    ///
    /// # Returns
    ///
    /// Returns `Some(chat_id)` for the first match, `None` when no dialog
    /// carries that exact name
    async fn resolve_chat(&self, name: &str) -> Result<Option<i64>>;

    /// Fetch up to `limit` most recent messages, newest first
    async fn fetch_messages(&self, chat_id: i64, limit: i64) -> Result<Vec<Message>>;

    /// Fetch up to `limit` most recent messages from a single sender
    async fn fetch_messages_from(
        &self,
        chat_id: i64,
        sender_id: i64,
        limit: i64,
    ) -> Result<Vec<Message>>;

    /// Fetch the full participant list for a chat; no limit applied
    async fn fetch_participants(&self, chat_id: i64) -> Result<Vec<User>>;

    /// Bulk-delete the given messages
    ///
    /// # Returns
    ///
    /// Returns the service-reported count actually removed, which may be
    /// less than requested if some were already gone; not verified
    /// independently here
    async fn delete_messages(&self, chat_id: i64, ids: &[i64]) -> Result<usize>;

    /// Collect messages whose timestamp falls within `[start, end]` inclusive
    ///
    /// Pages backward from `end` and stops at the first message older than
    /// `start`. Messages are returned in encounter order, newest first.
    /// Early termination assumes the service yields messages in
    /// non-increasing timestamp order; a service that violates that ordering
    /// silently loses older in-range messages past the first too-old one.
    /// This is a known, accepted limitation.
    async fn fetch_messages_between(
        &self,
        chat_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Message>>;
}
