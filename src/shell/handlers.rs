//! Command handlers for the interactive shell
//!
//! Each handler takes the service facade, the session state, and the
//! already-tokenized arguments, and returns the lines to print. Handlers
//! never print directly so the loop owns all terminal output.

use crate::error::Result;
use crate::export;
use crate::service::types::{Message, User};
use crate::service::ChatService;
use crate::session::SessionState;
use crate::shell::parser::{is_message_target, is_user_target, parse_target_limit};

use std::path::Path;

/// Result of running one command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Lines to print before the next prompt
    Lines(Vec<String>),
    /// End the session after this iteration
    Exit,
}

impl Outcome {
    fn line(text: impl Into<String>) -> Self {
        Outcome::Lines(vec![text.into()])
    }
}

const USAGE_SELECT: &str = "Usage: select <chat-name>";
const USAGE_LIST: &str = "Usage: list <messages|users> [limit]";
const USAGE_SAVE: &str = "Usage: save <messages|users> [limit]";
const USAGE_DELETE: &str = "Usage: delete messages [limit]";

fn display_opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn format_message(message: &Message) -> String {
    format!(
        "[id={}] sender={} text={}",
        message.id, message.from_id, message.text
    )
}

fn format_user(user: &User) -> String {
    format!(
        "[id={}] username={} first_name={} last_name={}",
        user.id,
        display_opt(&user.username),
        display_opt(&user.first_name),
        display_opt(&user.last_name)
    )
}

/// Resolve a chat by display name and make it the current selection
pub async fn handle_select(
    service: &dyn ChatService,
    session: &mut SessionState,
    args: &[String],
) -> Result<Outcome> {
    if args.is_empty() {
        return Ok(Outcome::line(USAGE_SELECT));
    }
    let name = args.join(" ");

    match service.resolve_chat(&name).await? {
        Some(chat_id) => {
            session.current_chat = Some(chat_id);
            tracing::info!("Selected chat '{}' (id={})", name, chat_id);
            Ok(Outcome::line(format!("Chat selected: {}", name)))
        }
        None => Ok(Outcome::line("Chat not found.")),
    }
}

/// Print recent messages or the participant roster of the current chat
pub async fn handle_list(
    service: &dyn ChatService,
    session: &SessionState,
    args: &[String],
) -> Result<Outcome> {
    let (target, limit) = parse_target_limit(args, session.default_limit);
    let (Some(target), Some(limit)) = (target, limit) else {
        return Ok(Outcome::line(USAGE_LIST));
    };
    let Some(chat_id) = session.current_chat else {
        return Ok(Outcome::line("No chat selected"));
    };

    if is_message_target(&target) {
        let messages = service.fetch_messages(chat_id, limit).await?;
        Ok(Outcome::Lines(
            messages.iter().map(format_message).collect(),
        ))
    } else if is_user_target(&target) {
        let users = service.fetch_participants(chat_id).await?;
        Ok(Outcome::Lines(users.iter().map(format_user).collect()))
    } else {
        Ok(Outcome::line("Unknown target. Use 'messages' or 'users'."))
    }
}

/// Export messages or the participant roster to a timestamped JSON file
pub async fn handle_save(
    service: &dyn ChatService,
    session: &SessionState,
    args: &[String],
    output_dir: &Path,
) -> Result<Outcome> {
    let (target, limit) = parse_target_limit(args, session.default_limit);
    let (Some(target), Some(limit)) = (target, limit) else {
        return Ok(Outcome::line(USAGE_SAVE));
    };
    let Some(chat_id) = session.current_chat else {
        return Ok(Outcome::line("No chat selected"));
    };

    if is_message_target(&target) {
        let messages = service.fetch_messages(chat_id, limit).await?;
        let records = export::message_records(&messages);
        let path = export::export_json(output_dir, "messages", &records)?;
        Ok(Outcome::line(format!(
            "Saved {} messages to {}",
            records.len(),
            path.display()
        )))
    } else if is_user_target(&target) {
        let users = service.fetch_participants(chat_id).await?;
        let records = export::user_records(&users);
        let path = export::export_json(output_dir, "users", &records)?;
        Ok(Outcome::line(format!(
            "Saved {} users to {}",
            records.len(),
            path.display()
        )))
    } else {
        Ok(Outcome::line("Unknown target. Use 'messages' or 'users'."))
    }
}

/// Bulk-delete recent messages from the current chat
pub async fn handle_delete(
    service: &dyn ChatService,
    session: &SessionState,
    args: &[String],
) -> Result<Outcome> {
    let (target, limit) = parse_target_limit(args, session.default_limit);
    let (Some(target), Some(limit)) = (target, limit) else {
        return Ok(Outcome::line(USAGE_DELETE));
    };
    let Some(chat_id) = session.current_chat else {
        return Ok(Outcome::line("No chat selected"));
    };

    if !is_message_target(&target) {
        return Ok(Outcome::line(
            "Unknown delete target. Only 'messages' is supported.",
        ));
    }

    let messages = service.fetch_messages(chat_id, limit).await?;
    if messages.is_empty() {
        return Ok(Outcome::line("No messages to delete."));
    }

    let ids: Vec<i64> = messages.iter().map(|message| message.id).collect();
    let deleted = service.delete_messages(chat_id, &ids).await?;
    tracing::info!("Deleted {} of {} messages in chat {}", deleted, ids.len(), chat_id);
    Ok(Outcome::line(format!("Deleted {} messages", deleted)))
}

/// Print the authenticated account's username
pub async fn handle_me(service: &dyn ChatService) -> Result<Outcome> {
    let username = service.whoami().await?;
    Ok(Outcome::line(username))
}

/// Static command reference
pub fn help_outcome() -> Outcome {
    Outcome::Lines(
        [
            "Commands:",
            "  select <chat-name>          choose the chat to operate on",
            "  list <messages|users> [N]   print recent messages or the roster",
            "  save <messages|users> [N]   export to a timestamped JSON file",
            "  delete messages [N]         bulk-delete recent messages",
            "  me                          show the logged-in account",
            "  help                        show this reference",
            "  exit                        leave the shell",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MockChatService;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn owned(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn session_with_chat(chat_id: i64) -> SessionState {
        let mut session = SessionState::new(1000);
        session.current_chat = Some(chat_id);
        session
    }

    fn message(id: i64, from_id: i64, text: &str) -> Message {
        Message {
            id,
            from_id,
            text: text.to_string(),
            date: Some(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()),
        }
    }

    fn lines(outcome: Outcome) -> Vec<String> {
        match outcome {
            Outcome::Lines(lines) => lines,
            Outcome::Exit => panic!("expected printable outcome"),
        }
    }

    #[tokio::test]
    async fn test_select_without_args_prints_usage() {
        let service = MockChatService::new();
        let mut session = SessionState::new(1000);

        let outcome = handle_select(&service, &mut session, &[]).await.unwrap();
        assert_eq!(lines(outcome), vec![USAGE_SELECT.to_string()]);
        assert!(session.current_chat.is_none());
    }

    #[tokio::test]
    async fn test_select_joins_name_tokens() {
        let mut service = MockChatService::new();
        service
            .expect_resolve_chat()
            .withf(|name| name == "Team Chat")
            .times(1)
            .returning(|_| Ok(Some(99)));
        let mut session = SessionState::new(1000);

        let outcome = handle_select(&service, &mut session, &owned(&["Team", "Chat"]))
            .await
            .unwrap();
        assert_eq!(lines(outcome), vec!["Chat selected: Team Chat".to_string()]);
        assert_eq!(session.current_chat, Some(99));
    }

    #[tokio::test]
    async fn test_select_miss_leaves_selection_unchanged() {
        let mut service = MockChatService::new();
        service.expect_resolve_chat().returning(|_| Ok(None));
        let mut session = session_with_chat(5);

        let outcome = handle_select(&service, &mut session, &owned(&["Nope"]))
            .await
            .unwrap();
        assert_eq!(lines(outcome), vec!["Chat not found.".to_string()]);
        assert_eq!(session.current_chat, Some(5));
    }

    #[tokio::test]
    async fn test_list_without_selection_makes_no_call() {
        let service = MockChatService::new();
        let session = SessionState::new(1000);

        let outcome = handle_list(&service, &session, &owned(&["messages"]))
            .await
            .unwrap();
        assert_eq!(lines(outcome), vec!["No chat selected".to_string()]);
    }

    #[tokio::test]
    async fn test_list_messages_formats_lines() {
        let mut service = MockChatService::new();
        service
            .expect_fetch_messages()
            .withf(|chat_id, limit| *chat_id == 7 && *limit == 1000)
            .times(1)
            .returning(|_, _| Ok(vec![message(2, 11, "hi"), message(1, 12, "yo")]));
        let session = session_with_chat(7);

        let outcome = handle_list(&service, &session, &owned(&["messages"]))
            .await
            .unwrap();
        assert_eq!(
            lines(outcome),
            vec![
                "[id=2] sender=11 text=hi".to_string(),
                "[id=1] sender=12 text=yo".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_users_formats_missing_fields() {
        let mut service = MockChatService::new();
        service.expect_fetch_participants().returning(|_| {
            Ok(vec![User {
                id: 4,
                username: Some("ada".to_string()),
                first_name: None,
                last_name: None,
            }])
        });
        let session = session_with_chat(7);

        let outcome = handle_list(&service, &session, &owned(&["u"]))
            .await
            .unwrap();
        assert_eq!(
            lines(outcome),
            vec!["[id=4] username=ada first_name=- last_name=-".to_string()]
        );
    }

    #[tokio::test]
    async fn test_list_bad_count_prints_usage() {
        let service = MockChatService::new();
        let session = session_with_chat(7);

        let outcome = handle_list(&service, &session, &owned(&["messages", "abc"]))
            .await
            .unwrap();
        assert_eq!(lines(outcome), vec![USAGE_LIST.to_string()]);
    }

    #[tokio::test]
    async fn test_list_unknown_target() {
        let service = MockChatService::new();
        let session = session_with_chat(7);

        let outcome = handle_list(&service, &session, &owned(&["everything"]))
            .await
            .unwrap();
        assert_eq!(
            lines(outcome),
            vec!["Unknown target. Use 'messages' or 'users'.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_list_checks_selection_before_target() {
        let service = MockChatService::new();
        let session = SessionState::new(1000);

        let outcome = handle_list(&service, &session, &owned(&["everything"]))
            .await
            .unwrap();
        assert_eq!(lines(outcome), vec!["No chat selected".to_string()]);
    }

    #[tokio::test]
    async fn test_save_checks_selection_before_target() {
        let service = MockChatService::new();
        let session = SessionState::new(1000);
        let dir = TempDir::new().unwrap();

        let outcome = handle_save(&service, &session, &owned(&["everything"]), dir.path())
            .await
            .unwrap();
        assert_eq!(lines(outcome), vec!["No chat selected".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_checks_selection_before_target() {
        let service = MockChatService::new();
        let session = SessionState::new(1000);

        let outcome = handle_delete(&service, &session, &owned(&["users"]))
            .await
            .unwrap();
        assert_eq!(lines(outcome), vec!["No chat selected".to_string()]);
    }

    #[tokio::test]
    async fn test_save_users_empty_roster_writes_empty_array() {
        let mut service = MockChatService::new();
        service.expect_fetch_participants().returning(|_| Ok(vec![]));
        let session = session_with_chat(7);
        let dir = TempDir::new().unwrap();

        let outcome = handle_save(&service, &session, &owned(&["users"]), dir.path())
            .await
            .unwrap();
        let printed = lines(outcome);
        assert!(printed[0].starts_with("Saved 0 users to "));

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let path = entries[0].as_ref().unwrap().path();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[tokio::test]
    async fn test_save_messages_reports_count_and_path() {
        let mut service = MockChatService::new();
        service
            .expect_fetch_messages()
            .returning(|_, _| Ok(vec![message(1, 2, "a"), message(2, 2, "b")]));
        let session = session_with_chat(7);
        let dir = TempDir::new().unwrap();

        let outcome = handle_save(&service, &session, &owned(&["msg", "10"]), dir.path())
            .await
            .unwrap();
        let printed = lines(outcome);
        assert!(printed[0].starts_with("Saved 2 messages to "));
        assert!(printed[0].contains("messages_"));
    }

    #[tokio::test]
    async fn test_delete_reports_service_count() {
        let mut service = MockChatService::new();
        service
            .expect_fetch_messages()
            .withf(|_, limit| *limit == 5)
            .returning(|_, _| Ok(vec![message(3, 1, "a"), message(2, 1, "b"), message(1, 1, "c")]));
        service
            .expect_delete_messages()
            .withf(|_, ids| ids == [3, 2, 1])
            .times(1)
            .returning(|_, _| Ok(3));
        let session = session_with_chat(7);

        let outcome = handle_delete(&service, &session, &owned(&["messages", "5"]))
            .await
            .unwrap();
        assert_eq!(lines(outcome), vec!["Deleted 3 messages".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_empty_fetch_skips_delete_call() {
        let mut service = MockChatService::new();
        service.expect_fetch_messages().returning(|_, _| Ok(vec![]));
        service.expect_delete_messages().times(0);
        let session = session_with_chat(7);

        let outcome = handle_delete(&service, &session, &owned(&["messages"]))
            .await
            .unwrap();
        assert_eq!(lines(outcome), vec!["No messages to delete.".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_rejects_user_target() {
        let service = MockChatService::new();
        let session = session_with_chat(7);

        let outcome = handle_delete(&service, &session, &owned(&["users"]))
            .await
            .unwrap();
        assert_eq!(
            lines(outcome),
            vec!["Unknown delete target. Only 'messages' is supported.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_me_prints_username() {
        let mut service = MockChatService::new();
        service
            .expect_whoami()
            .returning(|| Ok("ada_l".to_string()));

        let outcome = handle_me(&service).await.unwrap();
        assert_eq!(lines(outcome), vec!["ada_l".to_string()]);
    }

    #[test]
    fn test_help_mentions_every_command() {
        let printed = lines(help_outcome());
        let joined = printed.join("\n");
        for command in ["select", "list", "save", "delete", "me", "help", "exit"] {
            assert!(joined.contains(command), "missing {}", command);
        }
    }
}
