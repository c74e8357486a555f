use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLoginArgs;
use crate::commands::auth::StatusResponse;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    args: &AuthLoginArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    ctx.resolver.sign_in(&args.email, &args.password).await?;
    ctx.resolver.refresh().await;
    let session = ctx.settle(|s| !s.loading && s.user.is_some()).await?;
    output(&StatusResponse::from_session(&session), flags.format)
}
