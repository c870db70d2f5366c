//! Line tokenization and command recognition for the interactive shell
//!
//! Tokenization follows shell-style quoting: single quotes take everything
//! literally, double quotes allow backslash escapes for `"` and `\`, and an
//! unquoted backslash escapes the next character. A line with an unclosed
//! quote or a trailing backslash is a parse error, reported to the user
//! without ending the session.

use thiserror::Error;

/// Errors produced while tokenizing an input line
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unclosed quote in input")]
    UnclosedQuote,

    #[error("Trailing backslash in input")]
    TrailingBackslash,
}

/// Shell commands keyed by the first token of a line
///
/// Recognition is case-insensitive. Arguments keep their original case;
/// targets are lowercased later during target parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(Vec<String>),
    List(Vec<String>),
    Save(Vec<String>),
    Delete(Vec<String>),
    Me,
    Help,
    Exit,
    Unknown(String),
}

/// Split an input line into tokens using shell-style quoting
///
/// # Errors
///
/// Returns `ParseError` for an unclosed quote or a trailing backslash
pub fn tokenize(line: &str) -> std::result::Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(inner) => current.push(inner),
                        None => return Err(ParseError::UnclosedQuote),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\')) => current.push(escaped),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(ParseError::UnclosedQuote),
                        },
                        Some(inner) => current.push(inner),
                        None => return Err(ParseError::UnclosedQuote),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return Err(ParseError::TrailingBackslash),
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Recognize a command from tokenized input
///
/// The caller guarantees `tokens` is non-empty; blank lines are filtered
/// out by the loop before this point.
pub fn recognize(tokens: Vec<String>) -> Command {
    let mut tokens = tokens;
    let head = tokens.remove(0).to_lowercase();
    match head.as_str() {
        "select" => Command::Select(tokens),
        "list" => Command::List(tokens),
        "save" => Command::Save(tokens),
        "delete" => Command::Delete(tokens),
        "me" => Command::Me,
        "help" => Command::Help,
        "exit" => Command::Exit,
        _ => Command::Unknown(head),
    }
}

/// Resolve the `<target> [N]` argument shape shared by list, save, delete
///
/// With no arguments both slots are `None` and the caller prints its usage
/// line. With one argument the target is lowercased and the count falls
/// back to `default_limit`. With two or more the second must parse as an
/// integer; when it does not, the target is discarded as well and the
/// caller again prints its usage line rather than a numeric error.
pub fn parse_target_limit(args: &[String], default_limit: i64) -> (Option<String>, Option<i64>) {
    match args {
        [] => (None, None),
        [target] => (Some(target.to_lowercase()), Some(default_limit)),
        [target, count, ..] => match count.parse::<i64>() {
            Ok(parsed) => (Some(target.to_lowercase()), Some(parsed)),
            Err(_) => (None, None),
        },
    }
}

/// True when a lowercased target names messages
pub fn is_message_target(target: &str) -> bool {
    matches!(target, "m" | "msg" | "message" | "messages")
}

/// True when a lowercased target names users
pub fn is_user_target(target: &str) -> bool {
    matches!(target, "u" | "user" | "users")
}
