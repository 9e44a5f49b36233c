//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ddlrepo - track warehouse DDL in a git repository
#[derive(Parser, Debug)]
#[command(name = "ddlrepo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.ddlrepo.toml)
    #[arg(long, global = true, env = "DDLREPO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile to use (defaults to the active profile)
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage connection profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Initialize the DDL tree root as a git repository
    ///
    /// Creates the tree root if needed, initializes a repository, and
    /// captures any pre-existing files in a baseline commit.
    Init,

    /// Show the active profile and the state of the DDL tree
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Preview what sync would change, with per-file diffs
    Diff,

    /// Extract DDL and synchronize the file tree
    Sync {
        /// Compute and report the plan without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Skip the commit after applying
        #[arg(long)]
        no_commit: bool,

        /// Push after a successful commit
        #[arg(long)]
        push: bool,

        /// Commit message override
        #[arg(short, long)]
        message: Option<String>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Profile management actions
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileAction {
    /// Add or replace a profile
    Add {
        name: String,

        /// Warehouse platform
        #[arg(long, default_value = "snowflake")]
        platform: String,

        /// Root directory of the DDL tree
        #[arg(long)]
        ddl_root: PathBuf,

        #[arg(long)]
        account: Option<String>,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        database: Option<String>,

        #[arg(long)]
        schema: Option<String>,

        #[arg(long)]
        warehouse: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        git_author_name: Option<String>,

        #[arg(long)]
        git_author_email: Option<String>,

        /// Push automatically after every sync commit
        #[arg(long)]
        auto_push: bool,

        /// Make this the active profile
        #[arg(long)]
        activate: bool,
    },

    /// List profiles
    List,

    /// Show one profile (defaults to the active one)
    Show { name: Option<String> },

    /// Set the active profile
    Use { name: String },

    /// Delete a profile
    Delete { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
