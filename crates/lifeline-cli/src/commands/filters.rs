use std::sync::Arc;

use anyhow::Context;
use lifeline_cache::{LocalCache, SearchFilters};
use lifeline_core::enums::BloodGroup;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{FilterCommands, FilterSetArgs};
use crate::output::output;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct FiltersResponse {
    city: Option<String>,
    blood_group: Option<String>,
}

impl FiltersResponse {
    fn from_filters(filters: &SearchFilters) -> Self {
        let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());
        Self {
            city: non_empty(filters.city()),
            blood_group: non_empty(filters.blood_group()),
        }
    }
}

/// Handle `lifeline filters`.
pub fn handle(
    action: &FilterCommands,
    cache: Arc<dyn LocalCache>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut filters = SearchFilters::load(cache);
    match action {
        FilterCommands::Show => {}
        FilterCommands::Set(args) => apply(&mut filters, args)?,
        FilterCommands::Clear => filters.clear(),
    }
    output(&FiltersResponse::from_filters(&filters), flags.format)
}

fn apply(filters: &mut SearchFilters, args: &FilterSetArgs) -> anyhow::Result<()> {
    if let Some(group) = &args.blood_group {
        let group = group.trim();
        if group.is_empty() {
            filters.set_blood_group("");
        } else {
            let parsed: BloodGroup = group
                .parse()
                .with_context(|| format!("invalid --blood-group '{group}'"))?;
            filters.set_blood_group(parsed.as_str());
        }
    }
    if let Some(city) = &args.city {
        filters.set_city(city.trim());
    }
    Ok(())
}
