use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "envdeck", bin_name = "envdeck", version = get_version())]
#[command(about = "Switch between named backend environments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (overrides the configured one)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration directory
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data files (runs implicitly before every command)
    Init,

    /// List environments
    #[command(alias = "ls")]
    List,

    /// Add an environment
    #[command(alias = "new")]
    Add {
        /// Unique name of the environment
        name: String,

        /// Backend url (scheme optional)
        url: String,

        /// Make it the active environment
        #[arg(short, long)]
        active: bool,

        /// Short description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Remove an environment and its documentation
    #[command(alias = "rm")]
    Remove { name: String },

    /// Make an environment the active one
    #[command(alias = "switch")]
    Use { name: String },

    /// Leave no environment active
    Unset,

    /// Show the active environment
    Active,

    /// Change fields of an environment in place
    Update {
        name: String,

        /// New name (documentation is not carried over; use `edit` for that)
        #[arg(long)]
        rename: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        active: Option<bool>,

        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,
    },

    /// Edit an environment and carry its documentation along
    #[command(alias = "e")]
    Edit {
        name: String,

        /// New name
        #[arg(long = "name", value_name = "NAME")]
        new_name: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// New documentation body
        #[arg(long, conflicts_with = "doc_file")]
        doc: Option<String>,

        /// Read the new documentation body from a file
        #[arg(long, value_name = "PATH")]
        doc_file: Option<PathBuf>,
    },

    /// Work with per-environment documentation
    Doc {
        #[command(subcommand)]
        action: DocCommands,
    },

    /// Check whether a url would be accepted
    CheckUrl { url: String },

    /// Get or set configuration
    Config {
        /// Configuration key (data-dir, log-level)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DocCommands {
    /// Print the documentation of an environment
    Show { name: String },

    /// Replace the documentation of an environment
    Set {
        name: String,

        /// New body
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        content: Option<String>,

        /// Read the body from a file
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// List documentation entries
    #[command(alias = "ls")]
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_flags() {
        let cli = Cli::try_parse_from([
            "envdeck",
            "add",
            "staging",
            "https://staging.example.com",
            "--active",
            "-d",
            "shared staging",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add {
                name,
                url,
                active,
                description,
            }) => {
                assert_eq!(name, "staging");
                assert_eq!(url, "https://staging.example.com");
                assert!(active);
                assert_eq!(description.as_deref(), Some("shared staging"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn global_data_dir_after_subcommand() {
        let cli = Cli::try_parse_from(["envdeck", "ls", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn update_description_flags_conflict() {
        let res = Cli::try_parse_from([
            "envdeck",
            "update",
            "A",
            "--description",
            "x",
            "--clear-description",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn doc_set_needs_body_or_file() {
        assert!(Cli::try_parse_from(["envdeck", "doc", "set", "A"]).is_err());
        assert!(Cli::try_parse_from(["envdeck", "doc", "set", "A", "body"]).is_ok());
        assert!(Cli::try_parse_from(["envdeck", "doc", "set", "A", "--file", "n.md"]).is_ok());
    }
}
