//! Recipe table parser
//!
//! Every `.table_rcp` / `.table_each_rcp` block of a search, recipe or
//! analysis page becomes one record. A malformed block is skipped on its own;
//! the rest of the document is still extracted.

#![allow(clippy::uninlined_format_args)]

use std::sync::Arc;

use anyhow::Result;
use scraper::{ElementRef, Html};
use tracing::debug;

use super::config::{ParsingConfig, RecipeSelectorSet};
use super::context::RecipeParseContext;
use super::dom::NodeExt;
use super::meta_info::extract_meta_info;
use super::original_text::{locate_original_texts, toggle_index};
use super::patterns::Patterns;
use super::recipe_rows::parse_recipe_steps;
use super::title::{extract_title_row, Identity};
use super::{ContextualParser, HtmlParser};
use crate::domain::{RecipeInfo, RecipeMeta, SearchResult};

/// Parser for recipe blocks on search / recipe / analysis pages
pub struct RecipeTableParser {
    selectors: RecipeSelectorSet,
    patterns: Arc<Patterns>,
    default_field_names: Vec<String>,
    min_text_length: usize,
}

impl RecipeTableParser {
    /// Create a new recipe table parser with default selectors
    pub fn new() -> Result<Self> {
        Self::with_config(&ParsingConfig::default(), Arc::new(Patterns::compile()?))
    }

    /// Create parser with custom selector configuration
    pub fn with_config(config: &ParsingConfig, patterns: Arc<Patterns>) -> Result<Self> {
        Ok(Self {
            selectors: RecipeSelectorSet::compile(&config.recipe_selectors)?,
            patterns,
            default_field_names: config.default_field_names.clone(),
            min_text_length: config.min_text_length,
        })
    }

    /// Search page blocks
    pub fn parse_search_results(&self, html: &Html) -> Vec<SearchResult> {
        self.parse(html).into_iter().map(SearchResult::from).collect()
    }

    /// Recipe page blocks, each with its `dup`
    pub fn parse_all_recipes(&self, html: &Html) -> Vec<RecipeInfo> {
        self.parse(html)
    }

    /// Number of recipe blocks the document contains
    pub fn count_blocks(&self, html: &Html) -> usize {
        html.root_element().find_all(&self.selectors.recipe_block).len()
    }

    fn parse_block<'a>(&self, document: &'a Html, block: ElementRef<'a>) -> Option<RecipeInfo> {
        let title = extract_title_row(block, &self.selectors, &self.patterns);
        if title.identity.is_unresolved() {
            return None;
        }

        let recipe = parse_recipe_steps(block, &self.selectors, &self.patterns, &self.default_field_names);
        let mut meta = title
            .row
            .map(|row| extract_meta_info(row, &self.selectors, &self.patterns))
            .unwrap_or_default();

        let index = toggle_index(title.row, &self.selectors, &self.patterns);
        let texts = locate_original_texts(block, document, index, self.min_text_length);
        meta.original_text = texts.original_text;
        meta.original_text_translation = texts.original_text_translation;

        Some(RecipeInfo {
            book: title.identity.book,
            liquor: title.identity.liquor,
            dup: title.dup,
            recipe,
            meta,
        })
    }

    /// Identity of the first title row; both links must carry text
    fn first_title_identity(&self, root: ElementRef<'_>) -> Option<Identity> {
        let row = root.find_first(&self.selectors.title_row)?;
        let anchors = row.find_all(&self.selectors.anchor);
        let (book, liquor) = (anchors.first()?, anchors.get(1)?);

        Some(Identity::new(book.trimmed_text(), liquor.trimmed_text())).filter(Identity::is_complete)
    }
}

impl HtmlParser for RecipeTableParser {
    type Output = Vec<RecipeInfo>;

    fn parse(&self, html: &Html) -> Self::Output {
        let blocks = html.root_element().find_all(&self.selectors.recipe_block);
        debug!("Found {} recipe blocks", blocks.len());

        let mut recipes = Vec::with_capacity(blocks.len());
        for (index, block) in blocks.into_iter().enumerate() {
            match self.parse_block(html, block) {
                Some(recipe) => recipes.push(recipe),
                None => debug!("Skipping recipe block {} without book/liquor", index),
            }
        }

        debug!("Successfully extracted {} recipes", recipes.len());
        recipes
    }
}

impl ContextualParser for RecipeTableParser {
    type Output = RecipeInfo;
    type Context = RecipeParseContext;

    /// Single recipe page: steps of the first block, identity of the first title row
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let root = html.root_element();
        let first_block = root.find_first(&self.selectors.detail_block);
        let container = first_block
            .or_else(|| root.find_first(&self.selectors.body))
            .unwrap_or(root);

        let recipe = parse_recipe_steps(container, &self.selectors, &self.patterns, &self.default_field_names);
        let identity = self.first_title_identity(root);
        if identity.is_none() {
            debug!("Recipe page has no title identity, using query {:?}", context);
        }

        let title_row = root.find_first(&self.selectors.title_row);
        let mut meta = title_row
            .map(|row| extract_meta_info(row, &self.selectors, &self.patterns))
            .unwrap_or_else(RecipeMeta::default);

        let index = toggle_index(Some(root), &self.selectors, &self.patterns);
        let texts = locate_original_texts(first_block.unwrap_or(root), html, index, self.min_text_length);
        meta.original_text = texts.original_text;
        meta.original_text_translation = texts.original_text_translation;

        let (book, liquor) = match identity {
            Some(identity) => (identity.book, identity.liquor),
            None => (
                context.book.clone().unwrap_or_default(),
                context.liquor.clone().unwrap_or_default(),
            ),
        };

        RecipeInfo {
            book,
            liquor,
            dup: context.dup_or_default(),
            recipe,
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPE_PAGE: &str = r#"<html><body>
        <table class="table_rcp">
          <tr class="tr_rcp_title"><td>
            <a href="b.php">산가요록</a> <a href="recipe.php?book=a&amp;liq=b&amp;dup=2" target="상세 주방문">감향주(甘香酒)</a>
            [발효주,순곡주] ☞ 유사:《잡초》
            <button class="toggle_org_button" onclick="ToggleText(this,1)">원문</button>
          </td></tr>
          <tr class="tr_rcp_grid"><td>밑술</td><td>1</td><td></td><td>1말</td></tr>
          <tr id="id_text_org_1"><td>甘香酒 白米一斗 百洗</td></tr>
        </table>
        <table class="table_rcp">
          <tr class="tr_rcp_title"><td>규합총서 석탄주</td></tr>
        </table>
        <table class="table_rcp">
          <tr><td></td></tr>
        </table>
      </body></html>"#;

    #[test]
    fn test_parser_creation() {
        assert!(RecipeTableParser::new().is_ok());
    }

    #[test]
    fn test_blocks_without_identity_are_skipped() {
        let parser = RecipeTableParser::new().unwrap();
        let html = Html::parse_document(RECIPE_PAGE);

        let recipes = parser.parse_all_recipes(&html);

        assert_eq!(parser.count_blocks(&html), 3);
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].book, "산가요록");
        assert_eq!(recipes[0].liquor, "감향주(甘香酒)");
        assert_eq!(recipes[0].dup, 2);
        assert_eq!(recipes[0].meta.liquor_hanja.as_deref(), Some("甘香酒"));
        assert_eq!(recipes[0].meta.original_text.as_deref(), Some("甘香酒 白米一斗 百洗"));
        assert_eq!(recipes[0].recipe[0].materials()[0].material_name, "멥쌀");
        assert_eq!(recipes[1].book, "규합총서");
        assert_eq!(recipes[1].liquor, "석탄주");
    }

    #[test]
    fn test_search_results_keep_meta() {
        let parser = RecipeTableParser::new().unwrap();
        let results = parser.parse_search_results(&Html::parse_document(RECIPE_PAGE));

        assert_eq!(results[0].meta.tags, Some(vec!["발효주".to_string(), "순곡주".to_string()]));
        assert_eq!(results[0].meta.similar_book.as_deref(), Some("잡초"));
    }

    #[test]
    fn test_detail_falls_back_to_query_identity() {
        let parser = RecipeTableParser::new().unwrap();
        let html = Html::parse_document(
            r#"<table class="table_each_rcp">
                 <tr class="tr_rcp_grid"><td>밑술</td><td>1</td><td></td><td>1말</td></tr>
               </table>"#,
        );
        let context = RecipeParseContext::new(Some("산가요록".into()), Some("감향주".into()));

        let recipe = parser.parse_with_context(&html, &context);

        assert_eq!(recipe.book, "산가요록");
        assert_eq!(recipe.liquor, "감향주");
        assert_eq!(recipe.dup, 1);
        assert_eq!(recipe.recipe.len(), 1);
    }

    #[test]
    fn test_empty_document() {
        let parser = RecipeTableParser::new().unwrap();
        assert!(parser.parse(&Html::parse_document("")).is_empty());
    }
}
