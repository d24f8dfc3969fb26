//! Entry categories.
//!
//! Forms offer a small preset list per entry kind plus `OTHER`, which takes a
//! free-text name. Once stored, a category is an arbitrary string: analytics
//! group by whatever text was saved and never assume the preset set.

use crate::{EngineError, ResultEngine, util::normalize_display};

/// Selection value that asks for a custom category name.
pub const OTHER: &str = "OTHER";

pub const FEED: &str = "FEED";
pub const VACCINES: &str = "VACCINES";
pub const MEDICATION: &str = "MEDICATION";
pub const EQUIPMENT: &str = "EQUIPMENT";
pub const MISCELLANEOUS: &str = "MISCELLANEOUS";

pub const CHICKEN_SALES: &str = "CHICKEN_SALES";
pub const EGG_SALES: &str = "EGG_SALES";
pub const BY_PRODUCTS: &str = "BY_PRODUCTS";

pub const EXPENSE_PRESETS: [&str; 5] = [FEED, VACCINES, MEDICATION, EQUIPMENT, MISCELLANEOUS];
pub const EARNING_PRESETS: [&str; 3] = [CHICKEN_SALES, EGG_SALES, BY_PRODUCTS];

/// Resolve a form selection into the category string to store.
///
/// `selection` must be one of `presets` or [`OTHER`]; with `OTHER` the
/// trimmed, whitespace-collapsed `custom` text is returned and it must not be
/// blank.
pub fn resolve_category(
    presets: &[&str],
    selection: &str,
    custom: Option<&str>,
) -> ResultEngine<String> {
    let selection = selection.trim();
    if selection == OTHER {
        return custom.and_then(normalize_display).ok_or_else(|| {
            EngineError::InvalidName("a custom category is required when OTHER is selected".to_string())
        });
    }
    presets
        .iter()
        .find(|preset| **preset == selection)
        .map(|preset| (*preset).to_string())
        .ok_or_else(|| EngineError::InvalidName(format!("unknown category: {selection}")))
}
