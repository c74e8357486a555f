use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
    was_signed_in: bool,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let was_signed_in = ctx.resolver.session().user.is_some();
    ctx.resolver.sign_out().await;
    output(
        &AuthLogoutResponse {
            cleared: true,
            was_signed_in,
        },
        flags.format,
    )
}
