use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthChooseRoleArgs;
use crate::commands::auth::StatusResponse;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    args: &AuthChooseRoleArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let session = ctx.resolver.session();
    if let (Some(_), Some(current)) = (&session.user, session.role)
        && current.is_assignable()
    {
        anyhow::bail!("this account already has the {current} role");
    }
    ctx.resolver.assign_role(args.role, &args.name).await?;
    output(&StatusResponse::from_session(&ctx.resolver.session()), flags.format)
}
