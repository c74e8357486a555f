use lifeline_config::LifelineConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::{AppContext, open_cache};

/// Dispatch a parsed command to the corresponding handler module.
///
/// `schema` and `filters` only touch local state; everything else needs the
/// hosted backend and a resolved session.
pub async fn dispatch(
    command: Commands,
    flags: &GlobalFlags,
    config: &LifelineConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Schema(args) => commands::schema::handle(&args, flags),
        Commands::Filters { action } => {
            commands::filters::handle(&action, open_cache(config)?, flags)
        }
        command => {
            let ctx = AppContext::init(config).await?;
            let result = match command {
                Commands::Auth { action } => commands::auth::handle(&action, &ctx, flags).await,
                Commands::Donors { action } => {
                    commands::donors::handle(&action, &ctx, flags).await
                }
                Commands::Banks { action } => commands::banks::handle(&action, &ctx, flags).await,
                Commands::Admin { action } => commands::admin::handle(&action, &ctx, flags).await,
                Commands::Schema(_) | Commands::Filters { .. } => {
                    unreachable!("schema/filters are handled without a backend")
                }
            };
            ctx.resolver.shutdown();
            result
        }
    }
}
