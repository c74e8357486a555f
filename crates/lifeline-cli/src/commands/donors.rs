use std::sync::Arc;

use lifeline_cache::SearchFilters;
use lifeline_core::entities::{Donor, DonorRegistration};
use lifeline_core::enums::{BloodGroup, Dashboard};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{DonorCommands, DonorListArgs, DonorRegisterArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `lifeline donors`.
pub async fn handle(
    action: &DonorCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DonorCommands::List(args) => list(args, ctx, flags).await,
        DonorCommands::Register(args) => register(args, ctx, flags).await,
    }
}

async fn list(args: &DonorListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let saved = SearchFilters::load(Arc::clone(&ctx.cache));
    let (city, group) = effective_filters(args, &saved);
    tracing::debug!(?city, ?group, "listing donors");

    let limit = Some(ctx.limit(flags));
    let donors: Vec<Donor> = match (city.as_deref(), group) {
        (Some(city), Some(group)) => {
            ctx.donors
                .by_city_and_blood_group(city, group, limit)
                .await?
        }
        (Some(city), None) => ctx.donors.by_city(city, limit).await?,
        (None, Some(group)) => ctx.donors.by_blood_group(group, limit).await?,
        (None, None) => ctx.donors.list_all(limit).await?,
    };
    output(&donors, flags.format)
}

/// Explicit flags win; otherwise the saved filters apply. Empty or
/// unparseable saved values are ignored.
fn effective_filters(
    args: &DonorListArgs,
    saved: &SearchFilters,
) -> (Option<String>, Option<BloodGroup>) {
    let city = args
        .city
        .clone()
        .or_else(|| Some(saved.city().to_string()))
        .filter(|c| !c.trim().is_empty());
    let group = args.blood_group.or_else(|| saved.parsed_blood_group());
    (city, group)
}

async fn register(
    args: &DonorRegisterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user = ctx.require_access(Dashboard::Donor)?;
    let registration = DonorRegistration {
        name: args.name.clone(),
        blood_group: args.blood_group,
        phone: args.phone.clone(),
        city: args.city.clone(),
        state: args.state.clone(),
    };
    let donor = ctx.donors.create(&user.uid, &registration).await?;
    output(&donor, flags.format)
}

#[cfg(test)]
mod tests {
    use lifeline_cache::MemoryCache;
    use pretty_assertions::assert_eq;

    use super::*;

    fn saved(city: &str, group: &str) -> SearchFilters {
        let mut filters = SearchFilters::load(Arc::new(MemoryCache::new()));
        filters.set_city(city);
        filters.set_blood_group(group);
        filters
    }

    #[test]
    fn saved_filters_apply_without_flags() {
        let args = DonorListArgs {
            city: None,
            blood_group: None,
        };
        assert_eq!(
            effective_filters(&args, &saved("Pune", "O-")),
            (Some("Pune".into()), Some(BloodGroup::ONegative))
        );
    }

    #[test]
    fn flags_override_saved_filters() {
        let args = DonorListArgs {
            city: Some("Goa".into()),
            blood_group: Some(BloodGroup::APositive),
        };
        assert_eq!(
            effective_filters(&args, &saved("Pune", "O-")),
            (Some("Goa".into()), Some(BloodGroup::APositive))
        );
    }

    #[test]
    fn empty_saved_filters_mean_everything() {
        let args = DonorListArgs {
            city: None,
            blood_group: None,
        };
        assert_eq!(effective_filters(&args, &saved("", "")), (None, None));
    }
}
