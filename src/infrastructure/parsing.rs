//! HTML extraction engine for the koreansool.kr archive
//!
//! The archive is table-based legacy markup without a stable schema. Every
//! parser here degrades to absent fields or skipped blocks instead of failing;
//! only selector/regex compilation at construction time can return an error.

pub mod book_list_parser;
pub mod book_row;
pub mod config;
pub mod context;
pub mod dom;
pub mod fallback;
pub mod meta_info;
pub mod original_text;
pub mod patterns;
pub mod recipe_rows;
pub mod recipe_table_parser;
pub mod reference_list_parser;
pub mod title;

// Re-export public types
pub use book_list_parser::BookListParser;
pub use config::ParsingConfig;
pub use context::RecipeParseContext;
pub use fallback::{first_success, Tier};
pub use patterns::Patterns;
pub use recipe_table_parser::RecipeTableParser;
pub use reference_list_parser::ReferenceListParser;
pub use title::{resolve_identity, split_title, Identity};

use scraper::Html;

/// Document-level parser producing one output per document
pub trait HtmlParser {
    type Output;

    /// Parse an already-built document
    fn parse(&self, html: &Html) -> Self::Output;
}

/// Parser that needs the query which produced the document
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output;
}
