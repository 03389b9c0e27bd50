//! Parsing of terminal input.

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append the line to the document and publish it
    Append(String),
    Show,
    Clear,
    Run { language_id: u32 },
    Leave,
    Help,
    /// A `:` command that could not be understood
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Append(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("show"), None, _) => Self::Show,
            (Some("clear"), None, _) => Self::Clear,
            (Some("leave"), None, _) => Self::Leave,
            (Some("help"), None, _) => Self::Help,
            (Some("run"), Some(language_id), None) => match language_id.parse::<u32>() {
                Ok(language_id) if language_id > 0 => Self::Run { language_id },
                _ => Self::Invalid(format!("invalid language id '{}'", language_id)),
            },
            (Some("run"), None, _) => Self::Invalid("usage: :run <language_id>".to_string()),
            _ => Self::Invalid(format!("unknown command '{}'", line)),
        }
    }
}
