//! HTTP implementation of the messaging-service facade
//!
//! Connects to the messaging service's REST API using a bearer token.
//! Endpoints used: `/me`, `/chats`, `/chats/{id}/messages`,
//! `/chats/{id}/participants`, and `/chats/{id}/messages/delete`.

use crate::config::ServiceConfig;
use crate::error::{ChatsweepError, Result};
use crate::service::types::{Chat, Message, User};
use crate::service::ChatService;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Page size used when walking message history backward
const HISTORY_PAGE_SIZE: i64 = 100;

/// HTTP chat-service client
///
/// # Examples
///
/// ```no_run
/// use chatsweep::config::ServiceConfig;
/// use chatsweep::service::{ChatService, HttpChatService};
///
/// # async fn example() -> chatsweep::error::Result<()> {
/// let config = ServiceConfig {
///     api_base: "https://chat.example.com".to_string(),
///     api_token: Some("t0ken".to_string()),
///     timeout_seconds: 30,
/// };
/// let service = HttpChatService::new(config)?;
/// let me = service.whoami().await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpChatService {
    client: Client,
    config: ServiceConfig,
}

/// Response from `/me`
#[derive(Debug, Deserialize)]
struct MeResponse {
    username: String,
}

/// Response from `/chats`
#[derive(Debug, Deserialize)]
struct ChatsResponse {
    chats: Vec<Chat>,
}

/// Response from `/chats/{id}/messages`
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    messages: Vec<Message>,
}

/// Response from `/chats/{id}/participants`
#[derive(Debug, Deserialize)]
struct ParticipantsResponse {
    users: Vec<User>,
}

/// Request body for `/chats/{id}/messages/delete`
#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    ids: &'a [i64],
}

/// Response from `/chats/{id}/messages/delete`
#[derive(Debug, Deserialize)]
struct DeleteResponse {
    deleted: usize,
}

impl HttpChatService {
    /// Create a new HTTP chat-service client
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("chatsweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ChatsweepError::Service(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!("Initialized chat service client: base={}", config.api_base);

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.api_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turn a non-success response into an error, preserving the body text
    async fn check_status(response: Response, operation: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("{} failed with {}: {}", operation, status, body);
        if status == StatusCode::UNAUTHORIZED {
            return Err(ChatsweepError::Authentication(format!(
                "service rejected the API token: {}",
                body
            ))
            .into());
        }
        Err(ChatsweepError::Service(format!(
            "{} returned {}: {}",
            operation, status, body
        ))
        .into())
    }

    /// Fetch one page of message history
    ///
    /// `from_id` filters to a single sender, `before_id` and `before_date`
    /// page backward through history. All three are optional and combined
    /// as AND constraints by the service.
    async fn fetch_page(
        &self,
        chat_id: i64,
        limit: i64,
        from_id: Option<i64>,
        before_id: Option<i64>,
        before_date: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>> {
        let url = self.endpoint(&format!("/chats/{}/messages", chat_id));
        let mut query: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if let Some(from_id) = from_id {
            query.push(("from_id", from_id.to_string()));
        }
        if let Some(before_id) = before_id {
            query.push(("before_id", before_id.to_string()));
        }
        if let Some(before_date) = before_date {
            query.push((
                "before_date",
                before_date.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }

        tracing::debug!("Fetching messages: chat={} limit={}", chat_id, limit);

        let response = self
            .authorize(self.client.get(&url).query(&query))
            .send()
            .await?;
        let response = Self::check_status(response, "message fetch").await?;
        let payload: MessagesResponse = response.json().await.map_err(|e| {
            ChatsweepError::Service(format!("Failed to parse message list: {}", e))
        })?;
        Ok(payload.messages)
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn whoami(&self) -> Result<String> {
        let url = self.endpoint("/me");
        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check_status(response, "account lookup").await?;
        let payload: MeResponse = response.json().await.map_err(|e| {
            ChatsweepError::Service(format!("Failed to parse account info: {}", e))
        })?;
        Ok(payload.username)
    }

    async fn resolve_chat(&self, name: &str) -> Result<Option<i64>> {
        let url = self.endpoint("/chats");
        tracing::debug!("Resolving chat by name: {}", name);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check_status(response, "chat list").await?;
        let payload: ChatsResponse = response
            .json()
            .await
            .map_err(|e| ChatsweepError::Service(format!("Failed to parse chat list: {}", e)))?;

        Ok(payload
            .chats
            .iter()
            .find(|chat| chat.name == name)
            .map(|chat| chat.id))
    }

    async fn fetch_messages(&self, chat_id: i64, limit: i64) -> Result<Vec<Message>> {
        self.fetch_page(chat_id, limit, None, None, None).await
    }

    async fn fetch_messages_from(
        &self,
        chat_id: i64,
        sender_id: i64,
        limit: i64,
    ) -> Result<Vec<Message>> {
        self.fetch_page(chat_id, limit, Some(sender_id), None, None)
            .await
    }

    async fn fetch_participants(&self, chat_id: i64) -> Result<Vec<User>> {
        let url = self.endpoint(&format!("/chats/{}/participants", chat_id));
        tracing::debug!("Fetching participants: chat={}", chat_id);

        let response = self.authorize(self.client.get(&url)).send().await?;
        let response = Self::check_status(response, "participant list").await?;
        let payload: ParticipantsResponse = response.json().await.map_err(|e| {
            ChatsweepError::Service(format!("Failed to parse participant list: {}", e))
        })?;
        Ok(payload.users)
    }

    async fn delete_messages(&self, chat_id: i64, ids: &[i64]) -> Result<usize> {
        let url = self.endpoint(&format!("/chats/{}/messages/delete", chat_id));
        tracing::info!("Deleting {} messages in chat {}", ids.len(), chat_id);

        let response = self
            .authorize(self.client.post(&url).json(&DeleteRequest { ids }))
            .send()
            .await?;
        let response = Self::check_status(response, "message delete").await?;
        let payload: DeleteResponse = response.json().await.map_err(|e| {
            ChatsweepError::Service(format!("Failed to parse delete result: {}", e))
        })?;
        Ok(payload.deleted)
    }

    async fn fetch_messages_between(
        &self,
        chat_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Message>> {
        // Walks history backward and stops at the first message older than
        // `start`. Correct only while the service yields non-increasing
        // timestamps; see the trait documentation for the accepted
        // limitation when it does not.
        let mut collected = Vec::new();
        let mut before_id: Option<i64> = None;

        loop {
            let page = self
                .fetch_page(chat_id, HISTORY_PAGE_SIZE, None, before_id, Some(end))
                .await?;
            if page.is_empty() {
                break;
            }
            before_id = page.last().map(|message| message.id);

            for message in page {
                let Some(date) = message.date else {
                    // Undated system entries carry no position in the window
                    continue;
                };
                if date < start {
                    tracing::debug!(
                        "Stopping history walk at message {} ({} < {})",
                        message.id,
                        date,
                        start
                    );
                    return Ok(collected);
                }
                if date <= end {
                    collected.push(message);
                }
            }
        }

        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_config(base: &str) -> ServiceConfig {
        ServiceConfig {
            api_base: base.to_string(),
            api_token: Some("secret".to_string()),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_client_creation() {
        let service = HttpChatService::new(service_config("http://localhost:8080"));
        assert!(service.is_ok());
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let service = HttpChatService::new(service_config("http://localhost:8080")).unwrap();
        assert_eq!(service.endpoint("/me"), "http://localhost:8080/me");
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let service = HttpChatService::new(service_config("http://localhost:8080/")).unwrap();
        assert_eq!(
            service.endpoint("/chats/1/messages"),
            "http://localhost:8080/chats/1/messages"
        );
    }
}
