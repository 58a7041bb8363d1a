//! Recipe records extracted from the archive's recipe tables
//!
//! 하나의 HTML 문서에서 새로 만들어지고 요청이 끝나면 버려지는 값 객체들입니다.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::pagination::PaginationMeta;

/// One material cell of a recipe step (e.g. `멥쌀` → `1말`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecipeMaterial {
    /// Field name taken from the table header (or the default vocabulary)
    pub material_name: String,
    pub value: String,
}

/// One row of a recipe table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecipeStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub step: Option<String>,
    /// Day offset of the step; unparseable cells become 0
    pub day: i32,
    /// `None` only after the step has been collapsed to `{day, memo}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub materials: Option<Vec<RecipeMaterial>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub memo: Option<String>,
}

impl RecipeStep {
    pub fn new(step: Option<String>, day: i32, materials: Vec<RecipeMaterial>, memo: Option<String>) -> Self {
        Self {
            step,
            day,
            materials: Some(materials),
            memo,
        }
        .collapsed()
    }

    /// Steps without materials whose memo just repeats the step label
    /// are reduced to `{day, memo}`.
    pub fn collapsed(self) -> Self {
        let no_materials = self.materials.as_ref().is_none_or(Vec::is_empty);
        let repeats_label = match (&self.step, &self.memo) {
            (Some(step), Some(memo)) => step.trim() == memo.trim(),
            _ => false,
        };

        if no_materials && repeats_label {
            Self {
                step: None,
                day: self.day,
                materials: None,
                memo: self.memo,
            }
        } else {
            self
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.step.is_none() && self.materials.is_none()
    }

    pub fn materials(&self) -> &[RecipeMaterial] {
        self.materials.as_deref().unwrap_or_default()
    }
}

/// Self-referential link to the single-recipe query of the API layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DetailRecipeLink {
    pub href: String,
    pub params: DetailRecipeParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DetailRecipeParams {
    pub book: String,
    pub liquor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub dup: Option<u32>,
}

/// Optional metadata parsed out of a recipe title row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecipeMeta {
    /// 술 이름 한자 (예: 甘香酒)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub liquor_hanja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    /// 분류 태그 (예: 발효주, 순곡주, 단양주)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub alias: Option<String>,
    /// 유사 문헌 (예: 잡초)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub similar_book: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub original_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub original_text_translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub detail_recipe: Option<DetailRecipeLink>,
}

/// Recipe block as returned by the search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchResult {
    pub book: String,
    pub liquor: String,
    pub recipe: Vec<RecipeStep>,
    #[serde(flatten)]
    pub meta: RecipeMeta,
}

/// Recipe block as returned by the recipe page, identified by (book, liquor, dup)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecipeInfo {
    pub book: String,
    pub liquor: String,
    pub dup: u32,
    pub recipe: Vec<RecipeStep>,
    #[serde(flatten)]
    pub meta: RecipeMeta,
}

impl RecipeInfo {
    pub const DEFAULT_DUP: u32 = 1;
}

impl From<RecipeInfo> for SearchResult {
    fn from(info: RecipeInfo) -> Self {
        Self {
            book: info.book,
            liquor: info.liquor,
            recipe: info.recipe,
            meta: info.meta,
        }
    }
}

/// Recipes the archive's analysis page (`anal1.php`) lists as similar to one recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SimilarRecipes {
    pub book: String,
    pub liquor: String,
    pub dup: u32,
    pub data: Vec<SearchResult>,
    pub meta: PaginationMeta,
}

/// Records that share the (book, liquor) identity used for de-duplication
pub trait RecipeIdentity {
    fn book(&self) -> &str;
    fn liquor(&self) -> &str;
}

impl RecipeIdentity for SearchResult {
    fn book(&self) -> &str {
        &self.book
    }

    fn liquor(&self) -> &str {
        &self.liquor
    }
}

impl RecipeIdentity for RecipeInfo {
    fn book(&self) -> &str {
        &self.book
    }

    fn liquor(&self) -> &str {
        &self.liquor
    }
}
