mod admin;
mod auth;
mod banks;
mod donors;
mod filters;

pub use admin::AdminCommands;
pub use auth::{AuthChooseRoleArgs, AuthCommands, AuthLoginArgs, AuthRegisterArgs};
pub use banks::{BankCommands, BankListArgs, BankRegisterArgs};
pub use donors::{DonorCommands, DonorListArgs, DonorRegisterArgs};
pub use filters::{FilterCommands, FilterSetArgs};

use lifeline_core::enums::{BloodGroup, Role};

/// clap value parser for roles a person can select.
pub(crate) fn parse_role(value: &str) -> Result<Role, String> {
    let role: Role = value.parse().map_err(|e: lifeline_core::errors::CoreError| e.to_string())?;
    if role.is_assignable() {
        Ok(role)
    } else {
        Err(format!(
            "'{value}' cannot be selected; choose one of: donor, blood_bank, admin"
        ))
    }
}

pub(crate) fn parse_blood_group(value: &str) -> Result<BloodGroup, String> {
    value
        .parse()
        .map_err(|e: lifeline_core::errors::CoreError| e.to_string())
}
