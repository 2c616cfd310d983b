//! Line assembly and slash commands for the terminal prompt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Reset,
    Help,
    Quit,
}

pub const HELP: &str = "Commands:
  /reset   clear the conversation (asks for confirmation)
  /help    show this help
  /quit    exit (Ctrl-D works too)
End a line with \\ to continue the message on the next line.";

/// Joins continuation lines (ending in `\`) into one message.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<String>,
}

impl LineBuffer {
    pub fn is_continuing(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Returns the complete message once a line without a trailing `\` arrives.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        let line = line.trim_end_matches(['\n', '\r']);
        match line.strip_suffix('\\') {
            Some(head) => {
                self.pending.push(head.to_string());
                None
            }
            None => {
                self.pending.push(line.to_string());
                Some(std::mem::take(&mut self.pending).join("\n"))
            }
        }
    }

    /// Flushes whatever was typed before end of input.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending).join("\n"))
        }
    }
}

/// Only single-line input can be a command; anything else is sent verbatim.
pub fn parse_command(message: &str) -> Command {
    if !message.contains('\n') {
        match message.trim() {
            "/reset" => return Command::Reset,
            "/help" | "/?" => return Command::Help,
            "/quit" | "/exit" => return Command::Quit,
            _ => {}
        }
    }
    Command::Send(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_completes_immediately() {
        let mut buffer = LineBuffer::default();
        assert_eq!(buffer.push_line("Hello\r\n"), Some("Hello".to_string()));
        assert!(!buffer.is_continuing());
    }

    #[test]
    fn trailing_backslash_continues_message() {
        let mut buffer = LineBuffer::default();
        assert_eq!(buffer.push_line("Senior engineer\\\n"), None);
        assert!(buffer.is_continuing());
        assert_eq!(buffer.push_line("Oslo, Norway\\\n"), None);
        assert_eq!(
            buffer.push_line("Apply by Friday\n"),
            Some("Senior engineer\nOslo, Norway\nApply by Friday".to_string())
        );
        assert!(!buffer.is_continuing());
    }

    #[test]
    fn finish_flushes_pending_lines_once() {
        let mut buffer = LineBuffer::default();
        buffer.push_line("unterminated\\");
        assert_eq!(buffer.finish(), Some("unterminated".to_string()));
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn recognizes_commands_with_surrounding_whitespace() {
        assert_eq!(parse_command("  /reset "), Command::Reset);
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/help"), Command::Help);
    }

    #[test]
    fn multi_line_and_unknown_slash_input_is_sent() {
        assert_eq!(
            parse_command("/reset\nplease"),
            Command::Send("/reset\nplease".to_string())
        );
        assert_eq!(
            parse_command("/etc/hosts looks wrong"),
            Command::Send("/etc/hosts looks wrong".to_string())
        );
    }
}
