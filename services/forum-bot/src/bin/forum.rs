//! LinkTrust Forum CLI
//!
//! Lists, posts and replies to GitHub Discussions as a GitHub App
//! installation.
//!
//! ## Usage
//! ```bash
//! forum test                                # Test connection
//! forum list                                # List recent discussions
//! forum post "Hello" "Welcome all" General  # Post new discussion
//! forum reply 12 "I agree!"                 # Reply to discussion
//! ```
//!
//! Credentials come from `GITHUB_APP_ID`, `GITHUB_INSTALLATION_ID` and
//! `GITHUB_PRIVATE_KEY_PATH` (or the matching flags).

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use linktrust_forum::discussions::{DiscussionRequest, ForumClient};
use linktrust_forum::{render, selftest, ConnectionArgs, ForumConfig, ForumError};
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const AFTER_HELP: &str = "\
Categories:
  Announcements, General, Ideas, Polls, Q&A, Show and tell

Examples:
  forum post \"Hello\" \"Welcome all\" \"General\"
  forum reply 12 \"I agree!\"
  forum list";

/// LinkTrust Forum CLI
#[derive(Parser, Debug)]
#[command(name = "forum")]
#[command(about = "Post to GitHub Discussions as a GitHub App")]
#[command(version)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Test the GitHub App connection
    Test {
        /// Also create a throwaway discussion to confirm the bot identity
        #[arg(long)]
        create_discussion: bool,
    },

    /// List recent discussions
    List,

    /// Post a new discussion
    Post {
        /// Discussion title
        title: String,

        /// Discussion body (Markdown)
        body: String,

        /// Category name (defaults to --default-category)
        category: Option<String>,
    },

    /// Reply to a discussion
    Reply {
        /// Discussion number
        #[arg(value_parser = clap::value_parser!(u64).range(1..=i32::MAX as u64))]
        number: u64,

        /// Comment body (Markdown)
        body: String,
    },
}

/// Parse arguments; help for unknown commands, exit 1 for malformed ones
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            ErrorKind::InvalidSubcommand => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                let _ = err.print();
                std::process::exit(ForumError::Usage(err.to_string()).exit_code());
            }
        },
    }
}

fn print_help() {
    let _ = Cli::command().print_help();
    println!();
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn run(command: Commands, connection: ConnectionArgs) -> linktrust_forum::Result<ExitCode> {
    let config = ForumConfig::try_from(connection)?;

    match command {
        Commands::Test { create_discussion } => {
            let report = selftest::run(&config, create_discussion).await?;
            for stage in &report.stages {
                println!("{}\n", stage.render());
            }
            if report.passed() {
                println!("✅ All tests passed!");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("❌ Tests did not fully pass");
                Ok(ExitCode::FAILURE)
            }
        }

        Commands::List => {
            let client = ForumClient::connect(config).await?;
            let discussions = client.list().await?;
            print!("{}", render::discussion_table(&discussions));
            info!("✅ Listed {} discussions", discussions.len());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Post {
            title,
            body,
            category,
        } => {
            let client = ForumClient::connect(config).await?;
            let request = DiscussionRequest {
                title,
                body,
                category,
            };
            let discussion = client.post(&request).await?;
            println!("{}", render::created_discussion(&discussion));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Reply { number, body } => {
            let client = ForumClient::connect(config).await?;
            let comment = client.reply(number, &body).await?;
            println!("{}", render::created_comment(&comment));
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = parse_cli();
    init_logging(cli.verbose)?;

    let Some(command) = cli.command else {
        print_help();
        return Ok(ExitCode::SUCCESS);
    };

    match run(command, cli.connection).await {
        Ok(code) => Ok(code),
        Err(err) => {
            eprintln!("❌ Error: {}", err);
            if let Some(errors) = err.graphql_errors() {
                eprintln!("Details: {}", serde_json::to_string_pretty(errors)?);
            }
            Ok(ExitCode::from(err.exit_code() as u8))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_post_with_optional_category() {
        let cli = Cli::try_parse_from(["forum", "post", "Hello", "Welcome all"]).unwrap();
        match cli.command {
            Some(Commands::Post { category, .. }) => assert!(category.is_none()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_reply_requires_integer_number() {
        let err = Cli::try_parse_from(["forum", "reply", "twelve", "I agree!"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["forum", "reply", "12"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_reply_number_must_fit_graphql_int() {
        let err = Cli::try_parse_from(["forum", "reply", "3000000000", "I agree!"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["forum", "reply", "0", "I agree!"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from(["forum", "reply", "2147483647", "I agree!"]).unwrap();
        match cli.command {
            Some(Commands::Reply { number, .. }) => assert_eq!(number, 2147483647),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_is_invalid_subcommand() {
        let err = Cli::try_parse_from(["forum", "frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_no_command_parses() {
        let cli = Cli::try_parse_from(["forum"]).unwrap();
        assert!(cli.command.is_none());
    }
}
