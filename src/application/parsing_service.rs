//! Parsing service layer
//!
//! String-in / records-out façade over the document parsers. The `scraper`
//! tree is built and dropped inside each call, so nothing here is held across
//! an `.await` by callers.

#![allow(clippy::uninlined_format_args)]

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::domain::{Book, RecipeInfo, Reference, SearchResult};
use crate::infrastructure::parsing::{
    BookListParser, ContextualParser, HtmlParser, ParsingConfig, Patterns, RecipeParseContext, RecipeTableParser,
    ReferenceListParser,
};

/// High-level parsing service that coordinates parsing operations
pub struct ParsingService {
    recipe_parser: Arc<RecipeTableParser>,
    book_parser: Arc<BookListParser>,
    reference_parser: Arc<ReferenceListParser>,
    table_selector: Selector,
}

impl ParsingService {
    /// Create a new parsing service with the given configuration
    pub fn new(config: ParsingConfig) -> Result<Self> {
        let patterns = Arc::new(Patterns::compile().context("Failed to compile extraction patterns")?);

        let recipe_parser = Arc::new(
            RecipeTableParser::with_config(&config, Arc::clone(&patterns))
                .context("Failed to create recipe table parser")?,
        );
        let book_parser = Arc::new(
            BookListParser::with_config(&config, Arc::clone(&patterns)).context("Failed to create book list parser")?,
        );
        let reference_parser =
            Arc::new(ReferenceListParser::with_config(&config).context("Failed to create reference list parser")?);
        let table_selector = Selector::parse("table").map_err(|e| anyhow!("Invalid table selector: {}", e))?;

        Ok(Self {
            recipe_parser,
            book_parser,
            reference_parser,
            table_selector,
        })
    }

    /// Search page → one result per recipe block
    pub fn parse_search_results(&self, html: &str) -> Vec<SearchResult> {
        let document = Html::parse_document(html);
        let results = self.recipe_parser.parse_search_results(&document);
        self.report("search", &document, results.len());
        results
    }

    /// Recipe page queried by book or liquor alone → every recipe block
    pub fn parse_all_recipes(&self, html: &str) -> Vec<RecipeInfo> {
        let document = Html::parse_document(html);
        let recipes = self.recipe_parser.parse_all_recipes(&document);
        self.report("recipes", &document, recipes.len());
        recipes
    }

    /// Recipe page queried by book and liquor → one recipe
    pub fn parse_recipe(&self, html: &str, context: &RecipeParseContext) -> RecipeInfo {
        debug!("Parsing single recipe for {:?}", context);

        let document = Html::parse_document(html);
        let recipe = self.recipe_parser.parse_with_context(&document, context);

        info!(
            "Successfully parsed recipe: {} - {} ({} steps)",
            recipe.book,
            recipe.liquor,
            recipe.recipe.len()
        );
        recipe
    }

    /// Analysis page listing similar recipes; same block layout as search
    pub fn parse_similar_recipes(&self, html: &str) -> Vec<SearchResult> {
        let document = Html::parse_document(html);
        let results = self.recipe_parser.parse_search_results(&document);
        self.report("similar recipes", &document, results.len());
        results
    }

    pub fn parse_books(&self, html: &str) -> Vec<Book> {
        let document = Html::parse_document(html);
        let books = self.book_parser.parse(&document);
        info!("Successfully parsed {} books", books.len());
        books
    }

    pub fn parse_references(&self, html: &str) -> Vec<Reference> {
        let document = Html::parse_document(html);
        let references = self.reference_parser.parse(&document);
        info!("Successfully parsed {} references", references.len());
        references
    }

    fn report(&self, kind: &str, document: &Html, extracted: usize) {
        if extracted > 0 {
            info!("Successfully parsed {} {} records", extracted, kind);
            return;
        }

        let blocks = self.recipe_parser.count_blocks(document);
        if blocks == 0 {
            warn!(
                "No recipe blocks found in {} page; {}",
                kind,
                self.structural_summary(document)
            );
        } else {
            warn!("{} recipe blocks in {} page, none with book/liquor", blocks, kind);
        }
    }

    /// Table count and distinct table classes, for diagnosing markup changes
    fn structural_summary(&self, document: &Html) -> String {
        let tables: Vec<_> = document.select(&self.table_selector).collect();
        let classes: BTreeSet<&str> = tables
            .iter()
            .filter_map(|table| table.value().attr("class"))
            .collect();

        format!(
            "tables={} classes=[{}]",
            tables.len(),
            classes.into_iter().collect::<Vec<_>>().join(", ")
        )
    }
}
