//! NewsAPI key resolution
//!
//! The key is resolved once, before any probe runs, and handed to the
//! NewsAPI probe as a plain `Option<String>`.

use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{debug, warn};

/// Whether the operator may be asked for a missing key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPolicy {
    /// Prompt on stdin when it is a terminal
    Interactive,
    /// Never prompt
    Never,
}

/// Resolve the NewsAPI key
///
/// A non-blank configured key wins. Otherwise `prompt` is called once when
/// the policy allows it; blank answers and prompt errors resolve to `None`.
pub fn resolve_news_api_key<P>(
    configured: Option<String>,
    policy: PromptPolicy,
    prompt: P,
) -> Option<String>
where
    P: FnOnce() -> io::Result<Option<String>>,
{
    if let Some(key) = non_blank(configured) {
        debug!("Using configured NewsAPI key");
        return Some(key);
    }

    if policy == PromptPolicy::Never {
        return None;
    }

    match prompt() {
        Ok(answer) => non_blank(answer),
        Err(e) => {
            warn!("Could not read NewsAPI key: {e}");
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Ask for the key on stderr and read one line from stdin
///
/// Returns `Ok(None)` without prompting when stdin is not a terminal, so
/// batch runs never block.
pub fn stdin_prompter() -> io::Result<Option<String>> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(None);
    }

    let mut stderr = io::stderr();
    write!(stderr, "Enter NewsAPI key (press Enter to skip): ")?;
    stderr.flush()?;

    let mut line = String::new();
    let read = stdin.lock().read_line(&mut line)?;
    Ok((read > 0).then_some(line))
}
