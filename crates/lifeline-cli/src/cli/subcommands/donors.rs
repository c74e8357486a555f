use clap::{Args, Subcommand};
use lifeline_core::enums::BloodGroup;

use super::parse_blood_group;

/// Donor directory commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DonorCommands {
    /// List donors, newest first. Falls back to the saved filters.
    List(DonorListArgs),
    /// Register the signed-in donor.
    Register(DonorRegisterArgs),
}

#[derive(Clone, Debug, Args)]
pub struct DonorListArgs {
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long, value_parser = parse_blood_group)]
    pub blood_group: Option<BloodGroup>,
}

#[derive(Clone, Debug, Args)]
pub struct DonorRegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, value_parser = parse_blood_group)]
    pub blood_group: BloodGroup,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: String,
}
