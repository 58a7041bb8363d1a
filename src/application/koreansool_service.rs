//! Query façade over the archive: fetch → extract → dedup → paginate
//!
//! This is what a thin API layer calls. Fetch errors are returned unchanged;
//! extraction never fails, so an unparseable page is an empty result.

#![allow(clippy::uninlined_format_args)]

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::parsing_service::ParsingService;
use crate::domain::{
    dedup_by_identity, paginate, Book, Paginated, RecipeInfo, Reference, SearchResult, SimilarRecipes, DEFAULT_PAGE,
};
use crate::infrastructure::config::PaginationConfig;
use crate::infrastructure::error::{KoreansoolError, KoreansoolResult};
use crate::infrastructure::koreansool_client::UpstreamSource;
use crate::infrastructure::parsing::RecipeParseContext;

/// Requested page; `None` fields fall back to the configured defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self { page, limit }
    }
}

/// Recipe lookup by book, liquor or both
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeQuery {
    pub book: Option<String>,
    #[serde(rename = "liq")]
    pub liquor: Option<String>,
    pub dup: Option<u32>,
    #[serde(flatten)]
    pub page: PageRequest,
}

impl RecipeQuery {
    fn book(&self) -> Option<&str> {
        non_blank(self.book.as_deref())
    }

    fn liquor(&self) -> Option<&str> {
        non_blank(self.liquor.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Book + liquor → one recipe; either alone → every matching recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecipeResponse {
    List(Paginated<RecipeInfo>),
    Single(RecipeInfo),
}

pub struct KoreansoolService<S: UpstreamSource> {
    source: Arc<S>,
    parsing: Arc<ParsingService>,
    pagination: PaginationConfig,
}

impl<S: UpstreamSource> KoreansoolService<S> {
    pub fn new(source: Arc<S>, parsing: Arc<ParsingService>, pagination: PaginationConfig) -> Self {
        Self {
            source,
            parsing,
            pagination,
        }
    }

    /// page ≥ 1, 1 ≤ limit ≤ max_limit, missing limit → default_limit
    pub fn normalize(&self, request: PageRequest) -> (u32, u32) {
        let page = request.page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = request
            .limit
            .unwrap_or(self.pagination.default_limit)
            .clamp(1, self.pagination.max_limit.max(1));
        (page, limit)
    }

    pub async fn search(&self, text: &str, request: PageRequest) -> KoreansoolResult<Paginated<SearchResult>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(KoreansoolError::invalid_query("search text must not be blank"));
        }

        let (page, limit) = self.normalize(request);
        let html = self.source.search(text).await?;
        let results = self.parsing.parse_search_results(&html);

        info!("Search '{}' matched {} recipes", text, results.len());
        Ok(paginate(results, page, limit))
    }

    pub async fn books(&self, request: PageRequest) -> KoreansoolResult<Paginated<Book>> {
        let (page, limit) = self.normalize(request);
        let html = self.source.books().await?;
        Ok(paginate(self.parsing.parse_books(&html), page, limit))
    }

    pub async fn references(&self, request: PageRequest) -> KoreansoolResult<Paginated<Reference>> {
        let (page, limit) = self.normalize(request);
        let html = self.source.references().await?;
        Ok(paginate(self.parsing.parse_references(&html), page, limit))
    }

    pub async fn recipes(&self, query: &RecipeQuery) -> KoreansoolResult<RecipeResponse> {
        let (book, liquor) = (query.book(), query.liquor());
        if book.is_none() && liquor.is_none() {
            return Err(KoreansoolError::invalid_query("book or liq is required"));
        }

        let html = self.source.recipe(book, liquor, query.dup).await?;

        if book.is_some() && liquor.is_some() {
            let context =
                RecipeParseContext::new(book.map(str::to_string), liquor.map(str::to_string)).with_dup(query.dup);
            return Ok(RecipeResponse::Single(self.parsing.parse_recipe(&html, &context)));
        }

        let (page, limit) = self.normalize(query.page);
        let recipes = dedup_by_identity(self.parsing.parse_all_recipes(&html));

        info!("Recipe query {:?}/{:?} yielded {} unique recipes", book, liquor, recipes.len());
        Ok(RecipeResponse::List(paginate(recipes, page, limit)))
    }

    pub async fn similar_recipes(
        &self,
        book: &str,
        liquor: &str,
        dup: Option<u32>,
        request: PageRequest,
    ) -> KoreansoolResult<SimilarRecipes> {
        let (book, liquor) = (book.trim(), liquor.trim());
        if book.is_empty() || liquor.is_empty() {
            return Err(KoreansoolError::invalid_query("book and liq are required"));
        }

        let dup = dup.filter(|dup| *dup > 0).unwrap_or(RecipeInfo::DEFAULT_DUP);
        let (page, limit) = self.normalize(request);
        let html = self.source.similar_recipes(book, liquor, dup).await?;
        let page = paginate(self.parsing.parse_similar_recipes(&html), page, limit);

        Ok(SimilarRecipes {
            book: book.to_string(),
            liquor: liquor.to_string(),
            dup,
            data: page.data,
            meta: page.meta,
        })
    }

    /// Scanned original page of one recipe
    pub async fn book_image(&self, book: &str, liquor: &str, dup: Option<u32>) -> KoreansoolResult<Vec<u8>> {
        self.source.image(book.trim(), liquor.trim(), dup).await
    }
}
