use clap::Subcommand;

/// Admin dashboard commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AdminCommands {
    /// Directory totals.
    Stats,
}
