//! Line commands read from stdin.

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Hide,
    /// Replace the search text
    Type(String),
    Submit,
    FocusLost,
    ClickOutside,
    /// Simulate a rotation or keyboard change
    Rotate,
    /// Re-read the config file
    Reload,
    Help,
    Quit,
}

impl Command {
    /// Parse a line. Blank lines yield `None`; unknown words are an error.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let command = match word {
            "toggle" | "t" => Self::Toggle,
            "hide" => Self::Hide,
            "type" => Self::Type(rest.trim().to_string()),
            "submit" | "enter" => Self::Submit,
            "focus-lost" => Self::FocusLost,
            "click-outside" => Self::ClickOutside,
            "rotate" => Self::Rotate,
            "reload" => Self::Reload,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Some(Err(format!("Unknown command: {other}"))),
        };
        Some(Ok(command))
    }
}

pub const HELP: &str = "\
Commands:
  toggle            Show or hide the start menu
  hide              Hide the start menu
  type <text>       Set the search text
  submit            Press Enter in the search field
  focus-lost        Take focus away from the search field
  click-outside     Tap the area around the list
  rotate            Simulate a configuration change
  reload            Re-read the config file
  quit              Tear down and exit";
