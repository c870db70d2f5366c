//! Chatsweep - Interactive chat inspection, export, and purge CLI library
//!
//! This library provides the core functionality for the chatsweep command
//! shell, including the messaging-service facade, session state, JSON
//! export, and configuration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `shell`: Interactive loop, tokenizer, and command handlers
//! - `service`: `ChatService` facade and its HTTP implementation
//! - `session`: Per-process shell state
//! - `export`: Timestamped JSON export of messages and rosters
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use chatsweep::config::Config;
//! use chatsweep::service::HttpChatService;
//! use chatsweep::shell::Shell;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let service = HttpChatService::new(config.service.clone())?;
//!     let mut shell = Shell::new(Box::new(service), &config);
//!     shell.run().await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod service;
pub mod session;
pub mod shell;

// Re-export commonly used types
pub use config::Config;
pub use error::{ChatsweepError, Result};
pub use service::{ChatService, HttpChatService};
pub use session::SessionState;
pub use shell::Shell;
