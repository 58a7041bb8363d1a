//! Field-driven recipe row parser
//!
//! A recipe table has an optional header row (`.tr_rcp_field`) naming its
//! columns and data rows (`.tr_rcp_grid`). Columns from index 2 on are
//! materials, except the step / day / memo columns.

use scraper::ElementRef;

use super::config::{RecipeSelectorSet, DAY_FIELD, MEMO_FIELD, STEP_FIELD};
use super::dom::NodeExt;
use super::patterns::Patterns;
use crate::domain::{RecipeMaterial, RecipeStep};

/// Column names from the header row, or `defaults` when the header is missing or blank
pub fn extract_field_names(
    container: ElementRef<'_>,
    selectors: &RecipeSelectorSet,
    defaults: &[String],
) -> Vec<String> {
    let from_header: Vec<String> = container
        .find_first(&selectors.field_row)
        .map(|header| {
            header
                .find_all(&selectors.cell)
                .iter()
                .map(NodeExt::trimmed_text)
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if from_header.is_empty() {
        defaults.to_vec()
    } else {
        from_header
    }
}

/// Build one step from trimmed cell texts.
///
/// Returns `None` for rows with neither a step label nor any material.
pub fn parse_row(cells: &[String], field_names: &[String], patterns: &Patterns) -> Option<RecipeStep> {
    let materials: Vec<RecipeMaterial> = cells
        .iter()
        .zip(field_names)
        .skip(2)
        .filter(|(value, name)| {
            !matches!(name.as_str(), STEP_FIELD | DAY_FIELD | MEMO_FIELD) && !value.trim().is_empty()
        })
        .map(|(value, name)| RecipeMaterial {
            material_name: name.clone(),
            value: value.trim().to_string(),
        })
        .collect();

    let step = cells.first().filter(|step| !step.is_empty()).cloned();
    if step.is_none() && materials.is_empty() {
        return None;
    }

    let day = cells.get(1).map_or(0, |day| patterns.parse_day(day));
    let memo = extract_memo(cells, field_names);

    Some(RecipeStep::new(step, day, materials, memo))
}

/// Memo column by header name; otherwise the surplus last cell
fn extract_memo(cells: &[String], field_names: &[String]) -> Option<String> {
    let memo = match field_names.iter().position(|name| name == MEMO_FIELD) {
        Some(index) if index < cells.len() => cells.get(index),
        _ if cells.len() > field_names.len() => cells.last(),
        _ => None,
    };

    memo.map(|memo| memo.trim().to_string())
        .filter(|memo| !memo.is_empty())
}

/// Parse every data row of `container` into ordered steps
pub fn parse_recipe_steps(
    container: ElementRef<'_>,
    selectors: &RecipeSelectorSet,
    patterns: &Patterns,
    default_field_names: &[String],
) -> Vec<RecipeStep> {
    let field_names = extract_field_names(container, selectors, default_field_names);

    container
        .find_all(&selectors.grid_row)
        .iter()
        .filter_map(|row| {
            let cells: Vec<String> = row
                .find_all(&selectors.cell)
                .iter()
                .map(NodeExt::trimmed_text)
                .collect();

            if cells.is_empty() {
                return None;
            }
            parse_row(&cells, &field_names, patterns)
        })
        .collect()
}
