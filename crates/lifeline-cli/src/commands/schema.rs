use lifeline_core::entities::{
    BloodBank, BloodBankRegistration, Donor, DonorRegistration, RoleRecord,
};
use lifeline_core::identity::AuthUser;
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `lifeline schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name {
        SchemaType::RoleRecord => schema_for!(RoleRecord),
        SchemaType::Donor => schema_for!(Donor),
        SchemaType::DonorRegistration => schema_for!(DonorRegistration),
        SchemaType::BloodBank => schema_for!(BloodBank),
        SchemaType::BloodBankRegistration => schema_for!(BloodBankRegistration),
        SchemaType::AuthUser => schema_for!(AuthUser),
    };
    output(&schema, flags.format)
}
