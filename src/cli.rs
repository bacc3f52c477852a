//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};

/// minem - manage a Minecraft dedicated server from the command line
#[derive(Parser, Debug)]
#[command(name = "minem")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a minem.json in the current directory
    Init,

    /// Download a server version; 'latest' and 'latest-snapshot' are accepted
    #[command(visible_alias = "get")]
    Download(DownloadArgs),

    /// Start the server in the current directory, or the registered server [name]
    Start(StartArgs),

    /// Read or change a server.properties setting
    Config(ConfigArgs),

    /// List the servers in the global registry
    Server,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Version id, 'latest' or 'latest-snapshot'
    pub version: String,
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Name of a server from the global registry
    pub name: Option<String>,

    /// Run in the background, detached from this terminal
    #[arg(short, long)]
    pub detach: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Setting key, e.g. 'gamemode'
    #[arg(required_unless_present = "list")]
    pub setting: Option<String>,

    /// New value; prints the current value when omitted
    pub value: Option<String>,

    /// List every setting
    #[arg(short, long, conflicts_with_all = ["setting", "value"])]
    pub list: bool,
}
