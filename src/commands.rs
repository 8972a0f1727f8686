//! Command-line parsing
//!
//! Parses `folio <command> [args]` into a [`CliCommand`].

use crate::backend::ItemId;
use crate::controller::DEFAULT_ACTION;
use crate::theme::{ColorPreset, ThemeMode};

/// Parsed command from the process arguments
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// No arguments: launch the window
    Gui,
    /// Print search results: search <query...>
    Search { query: String },
    /// Print recommendations: recommend [--uid U] [query...]
    Recommend { uid: Option<String>, query: String },
    /// Send one feedback event: feedback [--uid U] <item_id> [action]
    Feedback {
        uid: Option<String>,
        item_id: ItemId,
        action: String,
    },
    /// Show or change theme settings: theme [mode] [color]
    Theme {
        mode: Option<ThemeMode>,
        color: Option<ColorPreset>,
    },
    /// Show the config file, or write a default one: config [init]
    Config { init: bool },
    /// Open the backend API docs in a browser
    Docs,
    Help,
    /// Bad input; the message says why
    Invalid { message: String },
}

impl CliCommand {
    /// Parse arguments, excluding the program name
    pub fn parse(args: &[String]) -> Self {
        let Some(first) = args.first() else {
            return CliCommand::Gui;
        };
        let cmd = first.to_lowercase();
        let rest = &args[1..];

        match cmd.as_str() {
            "search" | "s" => CliCommand::Search {
                query: rest.join(" "),
            },
            "recommend" | "rec" | "r" => Self::parse_recommend(rest),
            "feedback" | "like" | "fb" => Self::parse_feedback(rest),
            "theme" | "t" => Self::parse_theme(rest),
            "config" => match rest {
                [] => CliCommand::Config { init: false },
                [sub] if sub == "init" => CliCommand::Config { init: true },
                _ => CliCommand::Invalid {
                    message: "Usage: folio config [init]".to_string(),
                },
            },
            "docs" => CliCommand::Docs,
            "help" | "--help" | "-h" => CliCommand::Help,
            _ => CliCommand::Invalid {
                message: format!("Unknown command: {}. Run 'folio help' for usage.", first),
            },
        }
    }

    fn parse_recommend(rest: &[String]) -> Self {
        const USAGE: &str = "Usage: folio recommend [--uid <uid>] [query]";
        match split_uid(rest) {
            Some((uid, words)) => CliCommand::Recommend {
                uid,
                query: words.join(" "),
            },
            None => CliCommand::Invalid {
                message: USAGE.to_string(),
            },
        }
    }

    fn parse_feedback(rest: &[String]) -> Self {
        const USAGE: &str = "Usage: folio feedback [--uid <uid>] <item_id> [action]";
        let (uid, item, action) = match split_uid(rest) {
            Some((uid, words)) => match words.as_slice() {
                [item] => (uid, *item, DEFAULT_ACTION),
                [item, action] => (uid, *item, *action),
                _ => {
                    return CliCommand::Invalid {
                        message: USAGE.to_string(),
                    }
                }
            },
            None => {
                return CliCommand::Invalid {
                    message: USAGE.to_string(),
                }
            }
        };

        CliCommand::Feedback {
            uid,
            item_id: ItemId::from(item),
            action: action.to_string(),
        }
    }

    fn parse_theme(rest: &[String]) -> Self {
        let mut mode = None;
        let mut color = None;

        for arg in rest {
            if let Ok(m) = arg.parse::<ThemeMode>() {
                mode = Some(m);
            } else if let Ok(c) = arg.parse::<ColorPreset>() {
                color = Some(c);
            } else {
                return CliCommand::Invalid {
                    message: format!(
                        "Unknown theme setting: {}. Modes: light, dark, auto. Colors: blue, purple, green, orange, red, teal.",
                        arg
                    ),
                };
            }
        }

        CliCommand::Theme { mode, color }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r#"Folio - book search and recommendation client

Usage: folio [command]

Commands:
  (none)                        Open the window
  search <query>                Search books
  recommend [--uid U] [query]   Recommendations for a user
  feedback [--uid U] <item_id> [action]
                                Send a feedback event (default action: click)
  theme [mode] [color]          Show or set the theme
  config [init]                 Show the config file, or write a default one
  docs                          Open the backend API documentation
  help                          Show this help

Environment:
  FOLIO_API_URL        Backend address (default http://127.0.0.1:8000)
  FOLIO_CONFIG         Path to config.toml
  FOLIO_COLOR_SCHEME   Force the system appearance (light|dark)
  RUST_LOG             Log filter, e.g. folio=debug"#
    }
}

/// Pull `--uid U`, `-u U` or `--uid=U` out of `rest`.
///
/// Returns the uid and the remaining words, or `None` for a dangling flag.
fn split_uid(rest: &[String]) -> Option<(Option<String>, Vec<&str>)> {
    let mut uid = None;
    let mut words = Vec::new();
    let mut iter = rest.iter();

    while let Some(arg) = iter.next() {
        if arg == "--uid" || arg == "-u" {
            uid = Some(iter.next()?.clone());
        } else if let Some(value) = arg.strip_prefix("--uid=") {
            uid = Some(value.to_string());
        } else {
            words.push(arg.as_str());
        }
    }

    Some((uid, words))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(CliCommand::parse(&[]), CliCommand::Gui);
    }

    #[test]
    fn test_parse_search() {
        match CliCommand::parse(&args(&["search", "war", "and", "peace"])) {
            CliCommand::Search { query } => assert_eq!(query, "war and peace"),
            other => panic!("Expected Search command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_recommend_with_uid() {
        match CliCommand::parse(&args(&["rec", "poetry", "--uid", "u7", "russian"])) {
            CliCommand::Recommend { uid, query } => {
                assert_eq!(uid.as_deref(), Some("u7"));
                assert_eq!(query, "poetry russian");
            }
            other => panic!("Expected Recommend command, got {:?}", other),
        }
        match CliCommand::parse(&args(&["recommend", "--uid=u8"])) {
            CliCommand::Recommend { uid, query } => {
                assert_eq!(uid.as_deref(), Some("u8"));
                assert_eq!(query, "");
            }
            other => panic!("Expected Recommend command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_recommend_dangling_uid() {
        assert!(matches!(
            CliCommand::parse(&args(&["recommend", "--uid"])),
            CliCommand::Invalid { .. }
        ));
    }

    #[test]
    fn test_parse_feedback() {
        assert_eq!(
            CliCommand::parse(&args(&["like", "42"])),
            CliCommand::Feedback {
                uid: None,
                item_id: ItemId::Int(42),
                action: "click".to_string()
            }
        );
        assert_eq!(
            CliCommand::parse(&args(&["feedback", "42", "borrow"])),
            CliCommand::Feedback {
                uid: None,
                item_id: ItemId::Int(42),
                action: "borrow".to_string()
            }
        );
        assert!(matches!(
            CliCommand::parse(&args(&["feedback"])),
            CliCommand::Invalid { .. }
        ));
    }

    #[test]
    fn test_parse_feedback_with_uid() {
        assert_eq!(
            CliCommand::parse(&args(&["feedback", "--uid", "u7", "42"])),
            CliCommand::Feedback {
                uid: Some("u7".to_string()),
                item_id: ItemId::Int(42),
                action: "click".to_string()
            }
        );
        assert_eq!(
            CliCommand::parse(&args(&["fb", "b-9", "borrow", "-u", "u8"])),
            CliCommand::Feedback {
                uid: Some("u8".to_string()),
                item_id: ItemId::Text("b-9".to_string()),
                action: "borrow".to_string()
            }
        );
        assert!(matches!(
            CliCommand::parse(&args(&["feedback", "42", "--uid"])),
            CliCommand::Invalid { .. }
        ));
        assert!(matches!(
            CliCommand::parse(&args(&["feedback", "--uid=u7"])),
            CliCommand::Invalid { .. }
        ));
    }

    #[test]
    fn test_parse_config() {
        assert_eq!(
            CliCommand::parse(&args(&["config"])),
            CliCommand::Config { init: false }
        );
        assert_eq!(
            CliCommand::parse(&args(&["config", "init"])),
            CliCommand::Config { init: true }
        );
        assert!(matches!(
            CliCommand::parse(&args(&["config", "reset"])),
            CliCommand::Invalid { .. }
        ));
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(
            CliCommand::parse(&args(&["theme", "teal", "auto"])),
            CliCommand::Theme {
                mode: Some(ThemeMode::Auto),
                color: Some(ColorPreset::Teal)
            }
        );
        assert_eq!(
            CliCommand::parse(&args(&["theme"])),
            CliCommand::Theme { mode: None, color: None }
        );
        assert!(matches!(
            CliCommand::parse(&args(&["theme", "sepia"])),
            CliCommand::Invalid { .. }
        ));
    }

    #[test]
    fn test_parse_unknown() {
        match CliCommand::parse(&args(&["launch"])) {
            CliCommand::Invalid { message } => assert!(message.contains("launch")),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }
}
