//! Parsing context for the single-recipe page
//!
//! The recipe page does not always repeat the identity it was queried with,
//! so the query itself travels along as a fallback.

use crate::domain::RecipeInfo;

/// Query that produced a recipe detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeParseContext {
    pub book: Option<String>,
    pub liquor: Option<String>,
    pub dup: Option<u32>,
}

impl RecipeParseContext {
    pub fn new(book: Option<String>, liquor: Option<String>) -> Self {
        Self {
            book,
            liquor,
            dup: None,
        }
    }

    pub fn with_dup(mut self, dup: Option<u32>) -> Self {
        self.dup = dup;
        self
    }

    /// `dup` reported for the recipe; the archive numbers recipes from 1
    pub fn dup_or_default(&self) -> u32 {
        self.dup.unwrap_or(RecipeInfo::DEFAULT_DUP)
    }
}
