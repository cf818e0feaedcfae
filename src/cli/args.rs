//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{LinkKind, MechanicId};

/// Evolution tree of game mechanics: browse, extend and draw the mechanic catalog
#[derive(Parser, Debug)]
#[command(name = "mechtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Backend base URL (overrides config and MECHTREE_API_URL)
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    pub api_url: Option<String>,

    /// Project directory for the local .mechtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List and create mechanics
    Mechanic {
        #[command(subcommand)]
        command: MechanicCommands,
    },

    /// List and create links between mechanics
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },

    /// Show the evolution tree rooted at a mechanic
    Tree {
        /// Root mechanic id
        id: MechanicId,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Export the whole catalog as graph elements (requires login)
    Graph {
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Log in, register, verify email
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum MechanicCommands {
    /// List all mechanics
    List,

    /// Create a mechanic
    Add {
        /// Mechanic name
        #[arg(short, long)]
        name: String,

        /// Short description
        #[arg(long, default_value = "")]
        description: String,

        /// Year of introduction (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// List all links
    List,

    /// Create a link between two mechanics
    Add {
        /// Source mechanic id
        #[arg(long)]
        from: Option<MechanicId>,

        /// Target mechanic id
        #[arg(long)]
        to: Option<MechanicId>,

        /// Relationship: evolves_to, extends, replaces, combines_with
        #[arg(short, long, default_value = "evolves_to")]
        kind: LinkKind,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "MECHTREE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "MECHTREE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Confirm an email address with the token from the verification mail
    Verify {
        token: String,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented tree for the terminal
    Text,
    /// Canvas display list (JSON)
    Canvas,
    /// Canvas rendered as SVG
    Svg,
    /// Flow-graph nodes and edges (JSON)
    Flow,
    /// Graph elements (JSON)
    Elements,
}
