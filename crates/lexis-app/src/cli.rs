use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lexis_types::Requester;

#[derive(Parser, Debug)]
#[command(name = "lexis", version, about = "Cached dictionary lookups with icons and audio")]
pub struct Cli {
    #[command(flatten)]
    pub identity: Identity,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Caller identity as vouched for by the credential service
#[derive(Args, Debug)]
pub struct Identity {
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[arg(long, global = true)]
    pub admin: bool,

    #[arg(long, global = true)]
    pub verified: bool,
}

impl Identity {
    pub fn requester(&self) -> Option<Requester> {
        let username = self.user.clone()?;

        Some(Requester {
            username,
            is_administrator: self.admin,
            is_verified: self.verified || self.admin,
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up a word, fetching it from the dictionary API on first use
    Lookup { word: String },

    /// Attach an icon image to a dictionary entry
    UploadIcon { entry: String, file: PathBuf },

    /// Approve a user-submitted icon
    ApproveIcon { id: u64 },

    /// List icons waiting for approval
    PendingIcons,

    /// Fetch or show the cached pronunciation for a key
    Audio { key: String },
}
