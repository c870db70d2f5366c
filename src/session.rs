//! Session state for the interactive shell
//!
//! The shell owns exactly two pieces of mutable state: the currently
//! selected chat and the default fetch limit. Both live for the process
//! duration and are mutated only by the shell's own command handlers.

/// Mutable state for one interactive session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Identifier of the currently selected chat, set by `select`
    pub current_chat: Option<i64>,

    /// Message count used when a command omits its `[N]` argument
    pub default_limit: i64,
}

impl SessionState {
    /// Create session state with the given default fetch limit
    ///
    /// A non-positive limit falls back to 1000.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatsweep::session::SessionState;
    ///
    /// let state = SessionState::new(50);
    /// assert_eq!(state.default_limit, 50);
    /// assert!(state.current_chat.is_none());
    /// ```
    pub fn new(default_limit: i64) -> Self {
        let default_limit = if default_limit > 0 {
            default_limit
        } else {
            1000
        };
        Self {
            current_chat: None,
            default_limit,
        }
    }
}
