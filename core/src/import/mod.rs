//! Game export import
//!
//! Turns the JSON blob the game exports into [`Upgrade`]s on a nominal
//! schedule:
//!
//! ```text
//!   export item { data, lvl, timer }          catalog durations[data][lvl-1]
//!                  │                                      │
//!                  ▼                                      ▼
//!   end   = reference + timer            total = max(catalog, timer)
//!   start = end - total
//! ```
//!
//! Items without a positive `timer` are idle and skipped.

mod export;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::catalog::UpgradeCatalog;
use crate::upgrade::Upgrade;
use clashdash_types::UpgradeCategory;

pub use export::{ExportItem, GameExport};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("export is empty")]
    Empty,
    #[error("export is not valid JSON")]
    Json(#[from] serde_json::Error),
}

/// Everything one import produces
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Normalized player tag, if the export carried a non-empty one
    pub tag: Option<String>,
    /// Running upgrades, soonest finish first
    pub upgrades: Vec<Upgrade>,
    /// Home village upgrades running at once, a lower bound on builders
    pub inferred_builder_count: usize,
    /// The input exactly as given
    pub raw_json: String,
    pub imported_at: DateTime<Utc>,
}

/// Parse an export and schedule its running upgrades at `reference`
pub fn import_export(
    input: &str,
    catalog: &UpgradeCatalog,
    reference: DateTime<Utc>,
) -> Result<ImportResult, ImportError> {
    let export = parse_export(input)?;
    let upgrades = collect_upgrades(&export, catalog, reference);
    let inferred_builder_count = upgrades
        .iter()
        .filter(|u| u.category == UpgradeCategory::HomeVillage)
        .count();
    let tag = export
        .tag
        .as_deref()
        .map(normalize_tag)
        .filter(|tag| !tag.is_empty());

    tracing::info!(
        upgrades = upgrades.len(),
        builders = inferred_builder_count,
        tag = tag.as_deref().unwrap_or(""),
        "Imported game export"
    );

    Ok(ImportResult {
        tag,
        upgrades,
        inferred_builder_count,
        raw_json: input.to_string(),
        imported_at: reference,
    })
}

/// Upgrades an import would produce, without touching any profile
pub fn preview_import(
    input: &str,
    catalog: &UpgradeCatalog,
    reference: DateTime<Utc>,
) -> Result<Vec<Upgrade>, ImportError> {
    let export = parse_export(input)?;
    Ok(collect_upgrades(&export, catalog, reference))
}

/// Trim, drop `#` and uppercase a player tag
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().replace('#', "").to_uppercase()
}

fn parse_export(input: &str) -> Result<GameExport, ImportError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(serde_json::from_str(trimmed)?)
}

fn collect_upgrades(
    export: &GameExport,
    catalog: &UpgradeCatalog,
    reference: DateTime<Utc>,
) -> Vec<Upgrade> {
    let mut upgrades = Vec::new();
    for section in export.sections() {
        for item in section.items {
            let Some(timer) = item.upgrade_timer() else {
                continue;
            };
            match schedule_upgrade(
                item,
                timer,
                section.category,
                section.fallback_prefix,
                catalog,
                reference,
            ) {
                Some(upgrade) => upgrades.push(upgrade),
                None => tracing::warn!(
                    data_id = item.data,
                    timer,
                    "Skipping upgrade with out-of-range timer"
                ),
            }
        }
    }
    upgrades.sort_by_key(|u| u.end_time);
    upgrades
}

fn schedule_upgrade(
    item: &ExportItem,
    timer: i64,
    category: UpgradeCategory,
    fallback_prefix: &str,
    catalog: &UpgradeCatalog,
    reference: DateTime<Utc>,
) -> Option<Upgrade> {
    let remaining = timer as f64;
    let canonical = catalog.duration_for(item.data, item.lvl).unwrap_or(remaining);
    let total = canonical.max(remaining);

    let end = reference.checked_add_signed(Duration::try_seconds(timer)?)?;
    let start =
        end.checked_sub_signed(Duration::try_milliseconds((total * 1_000.0).round() as i64)?)?;
    let name = catalog
        .name(item.data)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{fallback_prefix} ({})", item.data));

    let target_level = item.lvl.saturating_add(1);
    let mut upgrade = Upgrade::new(item.data, name, target_level, category, start, end);
    upgrade.total_duration = total;
    Some(upgrade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    const EXPORT: &str = r##"{
        "tag": " #p2yl9q ",
        "timestamp": 1700000000,
        "buildings": [
            {"data": 1000008, "lvl": 3, "timer": 7200},
            {"data": 1000009, "lvl": 5},
            {"data": 1000010, "lvl": 2, "timer": 0, "cnt": 2},
            {"data": 1000011, "lvl": 1, "timer": 300}
        ],
        "buildings2": [{"data": 1000033, "lvl": 4, "timer": 60}],
        "heroes": [{"data": 28000000, "lvl": 40, "timer": 86400}],
        "pets": [{"data": 73000000, "lvl": 2, "timer": 1800}],
        "units": [{"data": 4000000, "lvl": 7, "timer": 3600}],
        "spells": [],
        "helpers": [{"data": 93000000, "lvl": 3}]
    }"##;

    fn catalog() -> UpgradeCatalog {
        let mut catalog = UpgradeCatalog::new();
        catalog.insert_name(1000008, "Cannon");
        catalog.insert_durations(1000008, vec![600.0, 3_600.0, 10_800.0, 14_400.0]);
        // Catalog shorter than the running timer
        catalog.insert_durations(4000000, vec![60.0]);
        catalog
    }

    #[test]
    fn test_import_schedules_running_upgrades() {
        let result = import_export(EXPORT, &catalog(), t(0)).unwrap();
        assert_eq!(result.tag.as_deref(), Some("P2YL9Q"));
        assert_eq!(result.upgrades.len(), 6);
        assert_eq!(result.inferred_builder_count, 3);

        let cannon = result.upgrades.iter().find(|u| u.data_id == 1000008).unwrap();
        assert_eq!(cannon.name, "Cannon");
        assert_eq!(cannon.target_level, 4);
        assert_eq!(cannon.end_time, t(7_200));
        assert_eq!(cannon.total_duration, 10_800.0);
        assert_eq!(cannon.start_time, t(7_200 - 10_800));
    }

    #[test]
    fn test_total_never_shorter_than_timer() {
        let result = import_export(EXPORT, &catalog(), t(0)).unwrap();
        let unit = result.upgrades.iter().find(|u| u.data_id == 4000000).unwrap();
        assert_eq!(unit.total_duration, 3_600.0);
        assert_eq!(unit.start_time, t(0));
        assert_eq!(unit.category, UpgradeCategory::Laboratory);
    }

    #[test]
    fn test_fallback_names_and_categories() {
        let result = import_export(EXPORT, &catalog(), t(0)).unwrap();
        let by_id = |id: i64| result.upgrades.iter().find(|u| u.data_id == id).unwrap();
        assert_eq!(by_id(1000033).name, "Builder Base Building (1000033)");
        assert_eq!(by_id(1000033).category, UpgradeCategory::BuilderBase);
        assert_eq!(by_id(73000000).name, "Pet (73000000)");
        assert_eq!(by_id(73000000).category, UpgradeCategory::PetHouse);
        assert_eq!(by_id(28000000).category, UpgradeCategory::HomeVillage);
    }

    #[test]
    fn test_upgrades_sorted_by_end() {
        let result = import_export(EXPORT, &catalog(), t(0)).unwrap();
        let ends: Vec<_> = result.upgrades.iter().map(|u| u.end_time).collect();
        let mut sorted = ends.clone();
        sorted.sort();
        assert_eq!(ends, sorted);
        assert_eq!(result.upgrades[0].data_id, 1000033);
    }

    #[test]
    fn test_preview_matches_import() {
        let preview = preview_import(EXPORT, &catalog(), t(0)).unwrap();
        assert_eq!(preview.len(), 6);
    }

    #[test]
    fn test_blank_and_malformed_input() {
        assert!(matches!(
            import_export("   \n", &catalog(), t(0)),
            Err(ImportError::Empty)
        ));
        assert!(matches!(
            import_export("{\"buildings\": [", &catalog(), t(0)),
            Err(ImportError::Json(_))
        ));
    }

    #[test]
    fn test_missing_tag_is_none() {
        let result = import_export(r##"{"timestamp": 0, "tag": "#"}"##, &catalog(), t(0)).unwrap();
        assert!(result.tag.is_none());
        assert!(result.upgrades.is_empty());
    }

    #[test]
    fn test_out_of_range_timer_is_skipped() {
        let input = r#"{
            "timestamp": 0,
            "buildings": [
                {"data": 1, "lvl": 1, "timer": 9000000000000000},
                {"data": 2, "lvl": 4294967295, "timer": 60}
            ]
        }"#;
        let result = import_export(input, &catalog(), t(0)).unwrap();
        assert_eq!(result.upgrades.len(), 1);
        assert_eq!(result.upgrades[0].data_id, 2);
        assert_eq!(result.upgrades[0].target_level, u32::MAX);
        assert_eq!(result.upgrades[0].end_time, t(60));
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("  #abc123 "), "ABC123");
        assert_eq!(normalize_tag("##"), "");
    }
}
