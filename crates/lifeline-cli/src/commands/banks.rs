use lifeline_core::entities::{BloodBank, BloodBankRegistration};
use lifeline_core::enums::Dashboard;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{BankCommands, BankListArgs, BankRegisterArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `lifeline banks`.
pub async fn handle(
    action: &BankCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        BankCommands::List(args) => list(args, ctx, flags).await,
        BankCommands::Register(args) => register(args, ctx, flags).await,
    }
}

/// The single equality filter the store runs for a listing.
#[derive(Debug, PartialEq, Eq)]
enum BankQuery<'a> {
    Verified,
    City(&'a str),
    State(&'a str),
    All,
}

/// Pick the store query for `args`. The flag is true when that query alone
/// answers the listing, so the row cap can be applied by the store.
fn plan(args: &BankListArgs) -> (BankQuery<'_>, bool) {
    let filters = [args.verified, args.city.is_some(), args.state.is_some()]
        .into_iter()
        .filter(|set| *set)
        .count();
    let query = if args.verified {
        BankQuery::Verified
    } else if let Some(city) = &args.city {
        BankQuery::City(city)
    } else if let Some(state) = &args.state {
        BankQuery::State(state)
    } else {
        BankQuery::All
    };
    (query, filters <= 1)
}

async fn list(args: &BankListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = ctx.limit(flags);
    let (query, exact) = plan(args);
    // With more than one filter the rest is applied here, so the store
    // cannot cap the rows.
    let store_limit = exact.then_some(limit);
    let mut banks: Vec<BloodBank> = match query {
        BankQuery::Verified => ctx.banks.verified(store_limit).await?,
        BankQuery::City(city) => ctx.banks.by_city(city, store_limit).await?,
        BankQuery::State(state) => ctx.banks.by_state(state, store_limit).await?,
        BankQuery::All => ctx.banks.list_all(store_limit).await?,
    };
    if !exact {
        banks.retain(|bank| matches_location(bank, args));
        banks.truncate(limit as usize);
    }
    output(&banks, flags.format)
}

fn matches_location(bank: &BloodBank, args: &BankListArgs) -> bool {
    args.city.as_ref().is_none_or(|city| &bank.city == city)
        && args.state.as_ref().is_none_or(|state| &bank.state == state)
        && (!args.verified || bank.is_verified)
}

async fn register(
    args: &BankRegisterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user = ctx.require_access(Dashboard::BloodBank)?;
    let registration = BloodBankRegistration {
        name: args.name.clone(),
        address: args.address.clone(),
        city: args.city.clone(),
        state: args.state.clone(),
        phone: args.phone.clone(),
        is_verified: None,
    };
    let bank = ctx.banks.create(&user.uid, &registration).await?;
    output(&bank, flags.format)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn bank(city: &str, state: &str, verified: bool) -> BloodBank {
        BloodBank {
            id: "b1".into(),
            name: "Bank".into(),
            address: "1 Road".into(),
            city: city.into(),
            state: state.into(),
            phone: "0".into(),
            is_verified: verified,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn args(city: Option<&str>, state: Option<&str>, verified: bool) -> BankListArgs {
        BankListArgs {
            city: city.map(str::to_string),
            state: state.map(str::to_string),
            verified,
        }
    }

    #[test]
    fn no_flags_match_everything() {
        assert!(matches_location(&bank("Kochi", "Kerala", false), &args(None, None, false)));
    }

    #[test]
    fn verified_with_city_needs_both() {
        let flags = args(Some("Kochi"), None, true);
        assert!(matches_location(&bank("Kochi", "Kerala", true), &flags));
        assert!(!matches_location(&bank("Kochi", "Kerala", false), &flags));
        assert!(!matches_location(&bank("Delhi", "Delhi", true), &flags));
    }

    #[test]
    fn single_filters_let_the_store_cap_rows() {
        assert_eq!(plan(&args(None, None, false)), (BankQuery::All, true));
        assert_eq!(plan(&args(None, None, true)), (BankQuery::Verified, true));
        assert_eq!(plan(&args(Some("Kochi"), None, false)), (BankQuery::City("Kochi"), true));
        assert_eq!(plan(&args(None, Some("Kerala"), false)), (BankQuery::State("Kerala"), true));
    }

    #[test]
    fn combined_filters_fetch_everything_then_narrow() {
        assert_eq!(plan(&args(Some("Kochi"), None, true)), (BankQuery::Verified, false));
        assert_eq!(
            plan(&args(Some("Aurangabad"), Some("Bihar"), false)),
            (BankQuery::City("Aurangabad"), false)
        );
    }

    #[test]
    fn city_and_state_combine() {
        let flags = args(Some("Aurangabad"), Some("Bihar"), false);
        assert!(matches_location(&bank("Aurangabad", "Bihar", false), &flags));
        assert!(!matches_location(&bank("Aurangabad", "Maharashtra", false), &flags));
    }
}
