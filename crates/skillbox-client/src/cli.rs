//! Command-line interface definitions.
//!
//! Positional arguments are collected loosely and checked by the handlers,
//! which print a usage line instead of failing when something is missing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Flags shared by every tool.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(long, short, global = true, env = "SKILLBOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,
}

/// calendar-tool - Google Calendar from the command line
#[derive(Debug, Parser)]
#[command(name = "calendar-tool")]
#[command(author, version, about, long_about = None)]
pub struct CalendarCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<CalendarCommand>,
}

/// Calendar commands.
#[derive(Debug, Subcommand)]
pub enum CalendarCommand {
    /// List upcoming events in the shared calendar
    List,

    /// Create an event: create <YYYY-MM-DD> <HH:MM> <duration-mins> <title>
    Create {
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// drive-tool - Google Drive from the command line
#[derive(Debug, Parser)]
#[command(name = "drive-tool")]
#[command(author, version, about, long_about = None)]
pub struct DriveCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<DriveCommand>,
}

/// Drive commands.
#[derive(Debug, Subcommand)]
pub enum DriveCommand {
    /// List recently modified files: list [page-size]
    List {
        #[arg(num_args = 0..)]
        args: Vec<String>,
    },

    /// Search files by name: search <query>
    Search {
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print a text file: read <name-or-id>
    Read {
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Upload a local file: upload <path> [folder]
    Upload {
        #[arg(num_args = 0..)]
        args: Vec<String>,
    },

    /// Create a text file: create <filename> <content...>
    ///
    /// Every word after the filename is content, including words that look
    /// like flags. Pass --debug or --config before create.
    Create {
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// save-knowledge - Save a markdown note and push it with git
#[derive(Debug, Parser)]
#[command(name = "save-knowledge")]
#[command(author, version, about, long_about = None)]
pub struct KnowledgeCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Note title
    pub title: Option<String>,

    /// Markdown content
    #[arg(allow_hyphen_values = true)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definitions_are_consistent() {
        CalendarCli::command().debug_assert();
        DriveCli::command().debug_assert();
        KnowledgeCli::command().debug_assert();
    }

    #[test]
    fn calendar_create_collects_arguments() {
        let cli = CalendarCli::try_parse_from([
            "calendar-tool",
            "create",
            "2024-03-15",
            "09:30",
            "45",
            "Team sync",
        ])
        .unwrap();
        match cli.command {
            Some(CalendarCommand::Create { args }) => {
                assert_eq!(args, ["2024-03-15", "09:30", "45", "Team sync"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = DriveCli::try_parse_from(["drive-tool"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn missing_arguments_still_parse() {
        let cli = DriveCli::try_parse_from(["drive-tool", "read"]).unwrap();
        assert!(matches!(cli.command, Some(DriveCommand::Read { ref args }) if args.is_empty()));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(DriveCli::try_parse_from(["drive-tool", "delete", "x"]).is_err());
        assert!(CalendarCli::try_parse_from(["calendar-tool", "remove"]).is_err());
    }

    #[test]
    fn drive_create_keeps_content_words() {
        let cli =
            DriveCli::try_parse_from(["drive-tool", "create", "todo.txt", "buy", "-milk", "now"])
                .unwrap();
        match cli.command {
            Some(DriveCommand::Create { args }) => {
                assert_eq!(args, ["todo.txt", "buy", "-milk", "now"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn drive_create_content_takes_trailing_flags() {
        let cli = DriveCli::try_parse_from(["drive-tool", "create", "a.txt", "hello", "--debug"])
            .unwrap();
        assert!(!cli.global.debug);
        assert!(
            matches!(cli.command, Some(DriveCommand::Create { ref args }) if args == &["a.txt", "hello", "--debug"])
        );

        let cli = DriveCli::try_parse_from(["drive-tool", "--debug", "create", "a.txt", "hello"])
            .unwrap();
        assert!(cli.global.debug);
        assert!(
            matches!(cli.command, Some(DriveCommand::Create { ref args }) if args == &["a.txt", "hello"])
        );

        let cmd = DriveCli::command();
        let help = cmd
            .find_subcommand("create")
            .and_then(|c| c.get_long_about())
            .map(ToString::to_string)
            .unwrap_or_default();
        assert!(help.contains("before create"), "{}", help);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = CalendarCli::try_parse_from([
            "calendar-tool",
            "list",
            "--debug",
            "--config",
            "/tmp/c.toml",
        ])
        .unwrap();
        assert!(cli.global.debug);
        assert_eq!(cli.global.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn knowledge_positionals() {
        let cli = KnowledgeCli::try_parse_from(["save-knowledge", "Title", "- a list"]).unwrap();
        assert_eq!(cli.title.as_deref(), Some("Title"));
        assert_eq!(cli.content.as_deref(), Some("- a list"));

        let cli = KnowledgeCli::try_parse_from(["save-knowledge"]).unwrap();
        assert!(cli.title.is_none());
    }
}
