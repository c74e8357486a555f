use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthRegisterArgs;
use crate::commands::auth::StatusResponse;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    args: &AuthRegisterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    ctx.resolver
        .sign_up(&args.email, &args.password, &args.name, args.role)
        .await?;
    output(&StatusResponse::from_session(&ctx.resolver.session()), flags.format)
}
