use lifeline_auth::{Phase, Session, credentials};
use lifeline_core::enums::Role;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
pub(crate) struct StatusResponse {
    phase: Phase,
    user_id: Option<String>,
    email: Option<String>,
    role: Option<Role>,
    home: &'static str,
    needs_role_selection: bool,
    credential_source: Option<&'static str>,
    note: Option<String>,
}

impl StatusResponse {
    pub(crate) fn from_session(session: &Session) -> Self {
        Self::with_source(session, credentials::detect_source())
    }

    fn with_source(session: &Session, credential_source: Option<&'static str>) -> Self {
        let note = if session.needs_role_selection() {
            Some("no role on record; run `lifeline auth choose-role --role <donor|blood_bank|admin>`".into())
        } else if session.user.is_none() {
            Some("signed out; run `lifeline auth login` or `lifeline auth register`".into())
        } else {
            None
        };
        Self {
            phase: session.phase(),
            user_id: session.user_id().map(str::to_string),
            email: session.user.as_ref().and_then(|u| u.email.clone()),
            role: session.role,
            home: session.home().path(),
            needs_role_selection: session.needs_role_selection(),
            credential_source,
            note,
        }
    }
}

pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&StatusResponse::from_session(&ctx.resolver.session()), flags.format)
}
