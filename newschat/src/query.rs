use crate::error::ChatError;

/// Suggestions offered while the transcript is still empty.
pub const QUICK_ACTIONS: [&str; 2] = ["Latest Tech News", "Trending Stories"];

/// Trim raw input; blank input is rejected.
pub fn normalize_query(raw: &str) -> Result<String, ChatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ChatError::EmptyQuery);
    }
    Ok(trimmed.to_string())
}

/// One line typed at the terminal prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    /// `#N`: show the card behind title N of the latest answer
    OpenTitle(&'a str),
    Query(&'a str),
    /// A `:` command that is not recognised, or a quick action no longer offered
    Unknown(&'a str),
}

/// Classify a prompt line. `:N` picks quick action N only while
/// `quick_actions_offered` holds; any other `:` input is never sent as a query.
pub fn parse_command(line: &str, quick_actions_offered: bool) -> Command<'_> {
    let line = line.trim();
    if let Some(n) = line.strip_prefix('#') {
        return Command::OpenTitle(n.trim());
    }
    let Some(name) = line.strip_prefix(':') else {
        return Command::Query(line);
    };
    if name == "quit" {
        return Command::Quit;
    }
    let action = name
        .parse::<usize>()
        .ok()
        .filter(|_| quick_actions_offered)
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| QUICK_ACTIONS.get(i).copied());
    match action {
        Some(label) => Command::Query(label),
        None => Command::Unknown(line),
    }
}

/// Text entry box state. Cleared only when a submission is accepted.
#[derive(Debug, Default, Clone)]
pub struct QueryInput {
    buffer: String,
}

impl QueryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Whether the send action should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.buffer.trim().is_empty()
    }

    /// Take the normalized query out of the buffer.
    pub fn submit(&mut self) -> Result<String, ChatError> {
        let query = normalize_query(&self.buffer)?;
        self.buffer.clear();
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_rejected_and_buffer_kept() {
        let mut input = QueryInput::new();
        input.set("   \t\n");
        assert!(!input.can_submit());
        assert_eq!(input.submit(), Err(ChatError::EmptyQuery));
        assert_eq!(input.text(), "   \t\n");
    }

    #[test]
    fn accepted_input_is_trimmed_and_cleared() {
        let mut input = QueryInput::new();
        input.set("  rust async ");
        input.push_str(" ");
        assert!(input.can_submit());
        assert_eq!(input.submit().as_deref(), Ok("rust async"));
        assert_eq!(input.text(), "");
    }

    #[test]
    fn quick_action_is_picked_only_while_offered() {
        assert_eq!(parse_command(":1", true), Command::Query("Latest Tech News"));
        assert_eq!(parse_command(" :2 ", true), Command::Query("Trending Stories"));
        assert_eq!(parse_command(":1", false), Command::Unknown(":1"));
    }

    #[test]
    fn unknown_colon_input_is_not_a_query() {
        for line in [":3", ":0", ":", ":help"] {
            assert_eq!(parse_command(line, true), Command::Unknown(line));
        }
    }

    #[test]
    fn prompt_lines_are_classified() {
        assert_eq!(parse_command(":quit", false), Command::Quit);
        assert_eq!(parse_command("#2", false), Command::OpenTitle("2"));
        assert_eq!(parse_command("  rust news ", true), Command::Query("rust news"));
        assert_eq!(parse_command("   ", true), Command::Query(""));
    }

    #[test]
    fn quick_actions_are_valid_queries() {
        for label in QUICK_ACTIONS {
            assert_eq!(normalize_query(label).as_deref(), Ok(label));
        }
    }
}
