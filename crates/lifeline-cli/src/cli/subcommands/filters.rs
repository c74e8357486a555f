use clap::{Args, Subcommand};

/// Saved search filter commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FilterCommands {
    /// Print the saved filters.
    Show,
    /// Update filters. An empty value removes that filter.
    Set(FilterSetArgs),
    /// Remove both filters.
    Clear,
}

#[derive(Clone, Debug, Args)]
pub struct FilterSetArgs {
    #[arg(long)]
    pub city: Option<String>,
    /// e.g. `O-`, `ab+`.
    #[arg(long)]
    pub blood_group: Option<String>,
}
