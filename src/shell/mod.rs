//! Interactive command shell
//!
//! Runs a readline-based loop: tokenize the line, dispatch on the first
//! token, print the handler's output, repeat. Service errors are printed
//! and the prompt comes back; only `exit` or end-of-input end the session.

pub mod handlers;
pub mod parser;

use crate::config::Config;
use crate::error::Result;
use crate::service::ChatService;
use crate::session::SessionState;
use self::handlers::Outcome;
use self::parser::Command;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

fn parse_error_line(error: &parser::ParseError) -> String {
    format!("Parse error: {}", error)
}

/// The interactive shell over a chat service
pub struct Shell {
    service: Box<dyn ChatService>,
    session: SessionState,
    output_dir: PathBuf,
}

impl Shell {
    /// Create a shell bound to a service and configuration
    pub fn new(service: Box<dyn ChatService>, config: &Config) -> Self {
        let session = SessionState::new(config.shell.default_limit);
        let output_dir = PathBuf::from(&config.shell.output_dir);
        Self {
            service,
            session,
            output_dir,
        }
    }

    /// Run the read-eval-print loop until `exit` or end of input
    ///
    /// # Errors
    ///
    /// Returns error only if the line editor cannot be initialized or
    /// history recording fails; command errors are printed and the loop
    /// continues.
    pub async fn run(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline("> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let tokens = match parser::tokenize(trimmed) {
                        Ok(tokens) => tokens,
                        Err(e) => {
                            eprintln!("{}", parse_error_line(&e).red());
                            continue;
                        }
                    };
                    if tokens.is_empty() {
                        continue;
                    }

                    match self.dispatch(parser::recognize(tokens)).await {
                        Ok(Outcome::Lines(lines)) => {
                            for line in lines {
                                println!("{}", line);
                            }
                        }
                        Ok(Outcome::Exit) => break,
                        Err(e) => {
                            tracing::error!("Command failed: {:#}", e);
                            eprintln!("{}", format!("Error: {:#}", e).red());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Select(args) => {
                handlers::handle_select(self.service.as_ref(), &mut self.session, &args).await
            }
            Command::List(args) => {
                handlers::handle_list(self.service.as_ref(), &self.session, &args).await
            }
            Command::Save(args) => {
                handlers::handle_save(
                    self.service.as_ref(),
                    &self.session,
                    &args,
                    &self.output_dir,
                )
                .await
            }
            Command::Delete(args) => {
                handlers::handle_delete(self.service.as_ref(), &self.session, &args).await
            }
            Command::Me => handlers::handle_me(self.service.as_ref()).await,
            Command::Help => Ok(handlers::help_outcome()),
            Command::Exit => Ok(Outcome::Exit),
            Command::Unknown(_) => Ok(Outcome::Lines(vec![
                "Unknown command. Type 'help'.".to_string(),
            ])),
        }
    }
}
