use lifeline_core::enums::Dashboard;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AdminCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct StatsResponse {
    donors: usize,
    blood_banks: usize,
    verified_blood_banks: usize,
    unverified_blood_banks: usize,
}

/// Handle `lifeline admin`.
pub async fn handle(
    action: &AdminCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AdminCommands::Stats => stats(ctx, flags).await,
    }
}

async fn stats(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_access(Dashboard::Admin)?;

    let (donors, banks) = tokio::try_join!(ctx.donors.list_all(None), ctx.banks.list_all(None))?;
    let verified = banks.iter().filter(|b| b.is_verified).count();

    output(
        &StatsResponse {
            donors: donors.len(),
            blood_banks: banks.len(),
            verified_blood_banks: verified,
            unverified_blood_banks: banks.len() - verified,
        },
        flags.format,
    )
}
