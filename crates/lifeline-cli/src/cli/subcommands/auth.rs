use clap::{Args, Subcommand};
use lifeline_core::enums::Role;

use super::parse_role;

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password.
    Login(AuthLoginArgs),
    /// Create an account and record its role.
    Register(AuthRegisterArgs),
    /// Sign out and forget the saved session.
    Logout,
    /// Show the resolved session.
    Status,
    /// Record a role for a signed-in account that has none.
    ChooseRole(AuthChooseRoleArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct AuthRegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    /// Display name stored on the role record.
    #[arg(long)]
    pub name: String,
    /// donor, blood_bank, or admin.
    #[arg(long, value_parser = parse_role)]
    pub role: Option<Role>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthChooseRoleArgs {
    #[arg(long, value_parser = parse_role)]
    pub role: Role,
    #[arg(long, default_value = "")]
    pub name: String,
}
