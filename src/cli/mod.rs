pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feedwatch")]
#[command(about = "Watch RSS/Atom feeds for keyword and regex matches", long_about = None)]
pub struct Cli {
    /// Subscriber (chat) id the command applies to
    #[arg(long, default_value = "default", global = true)]
    pub chat: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register the subscriber (created automatically by other commands too)
    Register,
    /// Add a feed source
    Add {
        /// URL of the feed to watch
        url: String,
    },
    /// Remove a feed source by number (see `list`)
    Remove {
        /// 1-based source number
        source: usize,
    },
    /// List feed sources
    List,
    /// Show the rules of one source
    Show {
        /// 1-based source number
        source: usize,
    },
    /// Manage matching rules
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },
    /// Run one poll cycle and exit
    Run,
    /// Background daemon that polls on an interval
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
}

#[derive(Subcommand)]
pub enum RuleAction {
    /// Add keyword expressions (`dmit`, `+VPS+优惠-免费`) or, with
    /// --regex, one regular expression
    Add {
        /// 1-based source number
        source: usize,
        /// Treat the arguments as one regular expression
        #[arg(long)]
        regex: bool,
        /// Expressions to add
        #[arg(required = true)]
        exprs: Vec<String>,
    },
    /// Remove rules by number (see `show`)
    Rm {
        /// 1-based source number
        source: usize,
        /// Remove from the regex list instead of the keyword list
        #[arg(long)]
        regex: bool,
        /// 1-based rule numbers
        #[arg(required = true)]
        numbers: Vec<usize>,
    },
}

#[derive(Subcommand)]
pub enum DaemonAction {
    /// Start the polling daemon
    Start {
        /// Poll interval (e.g. "30s", "5m", "1h"); defaults to the
        /// configured value
        #[arg(short, long)]
        interval: Option<String>,

        /// Skip the immediate first cycle
        #[arg(long)]
        no_initial_cycle: bool,
    },
    /// Stop the running daemon
    Stop,
    /// Check daemon status
    Status,
}
