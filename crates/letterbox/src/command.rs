//! User commands read from the terminal.

use letterbox_core::LetterId;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the stack.
    List,
    /// Select a letter: open it if on top, otherwise bring it to the top.
    Open(LetterId),
    /// Fold the open letter closed.
    Close,
    /// Fold the top letter away.
    Fold,
    /// Burn the top letter.
    Burn,
    /// Write a reply. The text goes nowhere.
    Reply(String),
    /// Check the post once the stack is empty.
    Reset,
    /// Connect a Gmail account.
    SignIn,
    /// Replace the stack with inbox messages.
    Import(Option<u32>),
    /// Disconnect the Gmail account.
    SignOut,
    /// Show the command list.
    Help,
    /// Exit.
    Quit,
}

/// Why an input line was not understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Nothing but whitespace.
    #[error("empty input")]
    Empty,
    /// Unknown command word.
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    /// A required argument is missing.
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Command {
    /// Parses one input line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(ParseError::Empty),
            "list" | "ls" => Ok(Self::List),
            "open" | "select" => {
                if rest.is_empty() {
                    Err(ParseError::Usage("open <id>"))
                } else {
                    Ok(Self::Open(LetterId::from(rest)))
                }
            }
            "close" => Ok(Self::Close),
            "fold" => Ok(Self::Fold),
            "burn" => Ok(Self::Burn),
            "reply" => {
                if rest.is_empty() {
                    Err(ParseError::Usage("reply <text>"))
                } else {
                    Ok(Self::Reply(rest.to_string()))
                }
            }
            "reset" | "check" => Ok(Self::Reset),
            "signin" => Ok(Self::SignIn),
            "import" => {
                if rest.is_empty() {
                    Ok(Self::Import(None))
                } else {
                    rest.parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .map(|n| Self::Import(Some(n)))
                        .ok_or(ParseError::Usage("import [count]"))
                }
            }
            "signout" => Ok(Self::SignOut),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

/// Text printed by `help`.
pub const HELP: &str = "\
Commands:
  list            show the stack
  open <id>       bring a letter to the top, or open it if already there
  close           fold the open letter closed
  fold            fold the top letter away
  burn            burn the top letter
  reply <text>    write a reply (it is never sent)
  reset           check the post when the stack is empty
  signin          connect a Gmail account
  import [count]  replace the stack with your inbox
  signout         disconnect Gmail
  quit            leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(Command::parse("list"), Ok(Command::List));
        assert_eq!(Command::parse("  FOLD "), Ok(Command::Fold));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
        assert_eq!(Command::parse(""), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(Command::parse("open 2"), Ok(Command::Open(LetterId::from(2))));
        assert_eq!(
            Command::parse("reply  See you Sunday "),
            Ok(Command::Reply("See you Sunday".into()))
        );
        assert_eq!(Command::parse("import"), Ok(Command::Import(None)));
        assert_eq!(Command::parse("import 5"), Ok(Command::Import(Some(5))));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("open"), Err(ParseError::Usage("open <id>")));
        assert_eq!(
            Command::parse("import zero"),
            Err(ParseError::Usage("import [count]"))
        );
        assert_eq!(
            Command::parse("import 0"),
            Err(ParseError::Usage("import [count]"))
        );
        assert!(matches!(Command::parse("send"), Err(ParseError::Unknown(_))));
    }
}
