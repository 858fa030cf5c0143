use std::path::PathBuf;

pub const HELP_TEXT: &str = "\
Commands:
  select <path>   choose an image (alias: open)
  clear           clear the selection
  check           submit the selected image
  health          ask whether the service is up
  help            show this text
  quit            leave (alias: exit)";

/// One line of user input, as understood by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Select(PathBuf),
    Clear,
    Check,
    Health,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> UserCommand {
    let line = line.trim();
    if line.is_empty() {
        return UserCommand::Empty;
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "select" | "open" if !rest.is_empty() => UserCommand::Select(PathBuf::from(unquote(rest))),
        "clear" => UserCommand::Clear,
        "check" => UserCommand::Check,
        "health" => UserCommand::Health,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" => UserCommand::Quit,
        _ => UserCommand::Unknown(line.to_string()),
    }
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}
