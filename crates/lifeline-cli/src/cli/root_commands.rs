use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{
    AdminCommands, AuthCommands, BankCommands, DonorCommands, FilterCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign in, register, and inspect the current session.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Saved search filters.
    Filters {
        #[command(subcommand)]
        action: FilterCommands,
    },
    /// Donor directory.
    Donors {
        #[command(subcommand)]
        action: DonorCommands,
    },
    /// Blood bank directory.
    Banks {
        #[command(subcommand)]
        action: BankCommands,
    },
    /// Admin dashboard.
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
    /// Dump JSON schema for a stored type.
    Schema(SchemaArgs),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    RoleRecord,
    Donor,
    DonorRegistration,
    BloodBank,
    BloodBankRegistration,
    AuthUser,
}

/// Arguments for `lifeline schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub type_name: SchemaType,
}
