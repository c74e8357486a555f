use clap::{Args, Subcommand};

/// Blood bank directory commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BankCommands {
    /// List blood banks, newest first.
    List(BankListArgs),
    /// Register the signed-in blood bank.
    Register(BankRegisterArgs),
}

#[derive(Clone, Debug, Args)]
pub struct BankListArgs {
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    /// Only banks an admin has verified.
    #[arg(long)]
    pub verified: bool,
}

#[derive(Clone, Debug, Args)]
pub struct BankRegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: String,
    #[arg(long)]
    pub phone: String,
}
