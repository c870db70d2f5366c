//! JSON export for messages and participant rosters
//!
//! Exports land under the configured output directory as
//! `messages_<YYYYMMDDHHMMSS>.json` or `users_<YYYYMMDDHHMMSS>.json`.
//! The timestamp resolves to one second, so two exports of the same kind
//! within the same second write to the same file and the last one wins.

use crate::error::{ChatsweepError, Result};
use crate::service::types::{Message, User};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One message as it appears in an export file
#[derive(Debug, Clone, Serialize)]
pub struct MessageRecord {
    pub id: i64,
    pub from: i64,
    pub text: String,
    pub date: Option<String>,
}

/// One participant as it appears in an export file
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Convert fetched messages into export records
///
/// Dates are rendered as ISO-8601 strings; messages without a date keep
/// a null in the output.
pub fn message_records(messages: &[Message]) -> Vec<MessageRecord> {
    messages
        .iter()
        .map(|message| MessageRecord {
            id: message.id,
            from: message.from_id,
            text: message.text.clone(),
            date: message.date.map(|date| date.to_rfc3339()),
        })
        .collect()
}

/// Convert fetched participants into export records
pub fn user_records(users: &[User]) -> Vec<UserRecord> {
    users
        .iter()
        .map(|user| UserRecord {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        })
        .collect()
}

/// Write records as a pretty-printed JSON array and return the file path
///
/// The output directory is created if it does not exist. The file name is
/// `<prefix>_<YYYYMMDDHHMMSS>.json` using the local clock.
///
/// # Arguments
///
/// * `output_dir` - Directory receiving the export file
/// * `prefix` - File name prefix, "messages" or "users"
/// * `records` - Records to serialize
///
/// # Errors
///
/// Returns error if the directory cannot be created or the file cannot
/// be written
pub fn export_json<T: Serialize>(
    output_dir: &Path,
    prefix: &str,
    records: &[T],
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let path = output_dir.join(format!("{}_{}.json", prefix, timestamp));

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    records.serialize(&mut serializer).map_err(|e| {
        ChatsweepError::Export(format!("Failed to serialize export records: {}", e))
    })?;

    let mut file = fs::File::create(&path)?;
    file.write_all(&buffer)?;
    file.write_all(b"\n")?;

    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}
