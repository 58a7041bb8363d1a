//! KoreansoolService driven by an in-memory upstream

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ko_drink_lib::application::{KoreansoolService, PageRequest, ParsingService, RecipeQuery, RecipeResponse};
use ko_drink_lib::infrastructure::parsing::ParsingConfig;
use ko_drink_lib::infrastructure::{KoreansoolError, KoreansoolResult, PaginationConfig, UpstreamSource};

const RECIPES_HTML: &str = include_str!("fixtures/recipes.html");
const RECIPE_DETAIL_HTML: &str = include_str!("fixtures/recipe_detail.html");
const BOOKS_HTML: &str = include_str!("fixtures/books.html");

/// Serves fixtures and records which upstream call was made
#[derive(Default)]
struct FixtureSource {
    calls: Mutex<Vec<String>>,
    fail_with_status: Option<u16>,
}

impl FixtureSource {
    fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::default()
        }
    }

    fn record(&self, call: String) -> KoreansoolResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with_status {
            Some(status) => Err(KoreansoolError::upstream_status(status, "http://fixture")),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamSource for FixtureSource {
    async fn search(&self, text: &str) -> KoreansoolResult<String> {
        self.record(format!("search:{text}"))?;
        Ok(RECIPES_HTML.to_string())
    }

    async fn books(&self) -> KoreansoolResult<String> {
        self.record("books".to_string())?;
        Ok(BOOKS_HTML.to_string())
    }

    async fn references(&self) -> KoreansoolResult<String> {
        self.record("references".to_string())?;
        Ok(String::new())
    }

    async fn recipe(&self, book: Option<&str>, liquor: Option<&str>, dup: Option<u32>) -> KoreansoolResult<String> {
        self.record(format!("recipe:{book:?}:{liquor:?}:{dup:?}"))?;
        Ok(if book.is_some() && liquor.is_some() {
            RECIPE_DETAIL_HTML.to_string()
        } else {
            RECIPES_HTML.to_string()
        })
    }

    async fn image(&self, book: &str, liquor: &str, dup: Option<u32>) -> KoreansoolResult<Vec<u8>> {
        self.record(format!("image:{book}:{liquor}:{dup:?}"))?;
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn similar_recipes(&self, book: &str, liquor: &str, dup: u32) -> KoreansoolResult<String> {
        self.record(format!("similar:{book}:{liquor}:{dup}"))?;
        Ok(RECIPES_HTML.to_string())
    }
}

fn service(source: Arc<FixtureSource>) -> KoreansoolService<FixtureSource> {
    let parsing = Arc::new(ParsingService::new(ParsingConfig::default()).unwrap());
    KoreansoolService::new(source, parsing, PaginationConfig::default())
}

#[tokio::test]
async fn search_is_paginated() {
    let source = Arc::new(FixtureSource::default());
    let page = service(Arc::clone(&source))
        .search(" 감향주 ", PageRequest::new(Some(2), Some(2)))
        .await
        .unwrap();

    assert_eq!(source.calls(), vec!["search:감향주".to_string()]);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.meta.total, 3);
    assert!(page.meta.has_prev);
    assert!(!page.meta.has_next);
}

#[tokio::test]
async fn blank_search_is_rejected_before_fetching() {
    let source = Arc::new(FixtureSource::default());
    let result = service(Arc::clone(&source)).search("   ", PageRequest::default()).await;

    assert!(matches!(result, Err(KoreansoolError::InvalidQuery { .. })));
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn recipes_by_book_are_deduplicated() {
    let source = Arc::new(FixtureSource::default());
    let query = RecipeQuery {
        book: Some("산가요록".to_string()),
        ..RecipeQuery::default()
    };

    let response = service(source).recipes(&query).await.unwrap();

    let RecipeResponse::List(page) = response else {
        panic!("expected a recipe list");
    };
    assert_eq!(page.meta.total, 2);
    assert!(page.data.iter().all(|recipe| !recipe.recipe.is_empty()));
}

#[tokio::test]
async fn recipe_by_book_and_liquor_is_single() {
    let source = Arc::new(FixtureSource::default());
    let query = RecipeQuery {
        book: Some("산가요록".to_string()),
        liquor: Some("감향주".to_string()),
        dup: Some(2),
        ..RecipeQuery::default()
    };

    let response = service(Arc::clone(&source)).recipes(&query).await.unwrap();

    let RecipeResponse::Single(recipe) = response else {
        panic!("expected a single recipe");
    };
    assert_eq!(recipe.dup, 2);
    assert_eq!(recipe.recipe.len(), 2);
    assert_eq!(
        source.calls(),
        vec![r#"recipe:Some("산가요록"):Some("감향주"):Some(2)"#.to_string()]
    );
}

#[tokio::test]
async fn recipe_query_needs_book_or_liquor() {
    let query = RecipeQuery {
        book: Some(" ".to_string()),
        ..RecipeQuery::default()
    };

    let result = service(Arc::new(FixtureSource::default())).recipes(&query).await;

    assert!(matches!(result, Err(KoreansoolError::InvalidQuery { .. })));
}

#[tokio::test]
async fn similar_recipes_default_dup() {
    let source = Arc::new(FixtureSource::default());
    let similar = service(Arc::clone(&source))
        .similar_recipes("산가요록", "감향주", None, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(similar.dup, 1);
    assert_eq!(similar.data.len(), 3);
    assert_eq!(similar.meta.limit, 10);
    assert_eq!(source.calls(), vec!["similar:산가요록:감향주:1".to_string()]);
}

#[tokio::test]
async fn limits_are_normalized() {
    let service = service(Arc::new(FixtureSource::default()));

    assert_eq!(service.normalize(PageRequest::new(Some(0), Some(0))), (1, 1));
    assert_eq!(service.normalize(PageRequest::new(None, Some(1_000))), (1, 100));
    assert_eq!(service.normalize(PageRequest::default()), (1, 10));

    let books = service.books(PageRequest::new(Some(1), Some(1))).await.unwrap();
    assert_eq!(books.data.len(), 1);
    assert_eq!(books.meta.total_pages, 2);
}

#[tokio::test]
async fn upstream_errors_are_propagated() {
    let service = service(Arc::new(FixtureSource::failing(503)));

    let error = service.references(PageRequest::default()).await.unwrap_err();

    assert!(matches!(error, KoreansoolError::UpstreamStatus { status: 503, .. }));
    assert!(error.is_recoverable());
}

#[tokio::test]
async fn image_bytes_pass_through() {
    let bytes = service(Arc::new(FixtureSource::default()))
        .book_image("산가요록", "감향주", Some(1))
        .await
        .unwrap();

    assert_eq!(&bytes[1..], b"PNG");
}
