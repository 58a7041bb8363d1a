//! Parsing configuration for koreansool HTML extraction
//!
//! Centralized configuration for CSS selectors and the recipe-table vocabulary.
//! Every selector slot is a list of fallbacks; the first one that matches wins.

#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Hits at or below this many characters are treated as noise
pub const MIN_TEXT_LENGTH: usize = 5;

pub const STEP_FIELD: &str = "단계";
pub const DAY_FIELD: &str = "일";
pub const MEMO_FIELD: &str = "메모";

/// Column vocabulary used when a recipe table has no header row
pub const DEFAULT_FIELD_NAMES: [&str; 25] = [
    "단계", "일", "발효", "멥쌀", "찹쌀", "침미", "물", "장수", "탕혼", "냉혼", "가공", "살수", "침숙",
    "누룩", "누룩형태", "침국", "녹국", "밀분", "석임", "여과", "가주", "온혼", "보쌈", "밀봉", "메모",
];

/// Main parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// Recipe block / title row selectors
    pub recipe_selectors: RecipeSelectors,

    /// Book and reference list selectors
    pub list_selectors: ListSelectors,

    /// Fallback column names for header-less recipe tables
    pub default_field_names: Vec<String>,

    /// Minimum trimmed length for original text / translation hits
    pub min_text_length: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            recipe_selectors: RecipeSelectors::default(),
            list_selectors: ListSelectors::default(),
            default_field_names: DEFAULT_FIELD_NAMES.iter().map(|name| (*name).to_string()).collect(),
            min_text_length: MIN_TEXT_LENGTH,
        }
    }
}

/// CSS selectors for recipe tables (search, recipe and analysis pages)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSelectors {
    /// 레시피 블록 (문서 순서 유지를 위해 하나의 selector 로 묶음)
    pub recipe_block: Vec<String>,
    /// 상세 페이지의 첫 번째 레시피 테이블
    pub detail_block: Vec<String>,
    pub title_row: Vec<String>,
    /// Title row fallback when no `.tr_rcp_title` exists
    pub first_row: Vec<String>,
    pub field_row: Vec<String>,
    pub grid_row: Vec<String>,
    pub cell: Vec<String>,
    pub anchor: Vec<String>,
    pub toggle_button: Vec<String>,
    /// 술 이름 한자가 들어 있는 링크
    pub hanja_anchor: Vec<String>,
    /// 상세 주방문 링크
    pub detail_anchor: Vec<String>,
    pub body: Vec<String>,
}

impl Default for RecipeSelectors {
    fn default() -> Self {
        Self {
            recipe_block: vec![".table_rcp, .table_each_rcp".to_string()],
            detail_block: vec![".table_each_rcp".to_string()],
            title_row: vec![".tr_rcp_title".to_string()],
            first_row: vec!["tr".to_string()],
            field_row: vec![".tr_rcp_field".to_string()],
            grid_row: vec![".tr_rcp_grid".to_string()],
            cell: vec!["td".to_string()],
            anchor: vec!["a".to_string()],
            toggle_button: vec![".toggle_org_button".to_string()],
            hanja_anchor: vec![r#"a[target*="상세 주방문"]"#.to_string()],
            detail_anchor: vec![
                r#"a.a_nowrap[target="동일"][title="상세 주방문"]"#.to_string(),
                r#"a[target="동일"][title="상세 주방문"]"#.to_string(),
            ],
            body: vec!["body".to_string()],
        }
    }
}

/// CSS selectors for the book list and reference list pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSelectors {
    pub row: Vec<String>,
    pub cell: Vec<String>,
    pub anchor: Vec<String>,
    pub line_break: Vec<String>,
    /// Header rows carry bold labels
    pub header_marker: Vec<String>,
}

impl Default for ListSelectors {
    fn default() -> Self {
        Self {
            row: vec!["table tr".to_string()],
            cell: vec!["td".to_string()],
            anchor: vec!["a".to_string()],
            line_break: vec!["br".to_string()],
            header_marker: vec!["b".to_string()],
        }
    }
}

/// Compiled form of [`RecipeSelectors`]
#[derive(Debug, Clone)]
pub struct RecipeSelectorSet {
    pub recipe_block: Vec<Selector>,
    pub detail_block: Vec<Selector>,
    pub title_row: Vec<Selector>,
    pub first_row: Vec<Selector>,
    pub field_row: Vec<Selector>,
    pub grid_row: Vec<Selector>,
    pub cell: Vec<Selector>,
    pub anchor: Vec<Selector>,
    pub toggle_button: Vec<Selector>,
    pub hanja_anchor: Vec<Selector>,
    pub detail_anchor: Vec<Selector>,
    pub body: Vec<Selector>,
}

impl RecipeSelectorSet {
    pub fn compile(selectors: &RecipeSelectors) -> Result<Self> {
        Ok(Self {
            recipe_block: compile_selectors(&selectors.recipe_block)?,
            detail_block: compile_selectors(&selectors.detail_block)?,
            title_row: compile_selectors(&selectors.title_row)?,
            first_row: compile_selectors(&selectors.first_row)?,
            field_row: compile_selectors(&selectors.field_row)?,
            grid_row: compile_selectors(&selectors.grid_row)?,
            cell: compile_selectors(&selectors.cell)?,
            anchor: compile_selectors(&selectors.anchor)?,
            toggle_button: compile_selectors(&selectors.toggle_button)?,
            hanja_anchor: compile_selectors(&selectors.hanja_anchor)?,
            detail_anchor: compile_selectors(&selectors.detail_anchor)?,
            body: compile_selectors(&selectors.body)?,
        })
    }
}

/// Compiled form of [`ListSelectors`]
#[derive(Debug, Clone)]
pub struct ListSelectorSet {
    pub row: Vec<Selector>,
    pub cell: Vec<Selector>,
    pub anchor: Vec<Selector>,
    pub line_break: Vec<Selector>,
    pub header_marker: Vec<Selector>,
}

impl ListSelectorSet {
    pub fn compile(selectors: &ListSelectors) -> Result<Self> {
        Ok(Self {
            row: compile_selectors(&selectors.row)?,
            cell: compile_selectors(&selectors.cell)?,
            anchor: compile_selectors(&selectors.anchor)?,
            line_break: compile_selectors(&selectors.line_break)?,
            header_marker: compile_selectors(&selectors.header_marker)?,
        })
    }
}

/// Compile multiple selector strings into Selector objects
pub fn compile_selectors(selector_strings: &[String]) -> Result<Vec<Selector>> {
    let mut selectors = Vec::new();
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("Failed to compile selector '{}': {}", selector_str, e);
                errors.push(format!("'{}': {}", selector_str, e));
            }
        }
    }

    if selectors.is_empty() {
        return Err(anyhow::anyhow!(
            "No valid selectors compiled from {} attempts. Errors: {}",
            selector_strings.len(),
            errors.join(", ")
        ));
    }

    if !errors.is_empty() {
        debug!("Some selectors failed to compile: {}", errors.join(", "));
    }

    Ok(selectors)
}
