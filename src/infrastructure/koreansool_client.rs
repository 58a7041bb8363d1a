//! Upstream endpoints of the koreansool.kr archive
//!
//! | 용도 | 요청 |
//! |------|------|
//! | 검색 | `GET print_table.php?table=SEARCH&_search_txt=` |
//! | 문헌 목록 | `GET print_table.php?table=book` |
//! | 참고 문헌 | `GET print_table.php?table=ref` |
//! | 주방문 | `GET recipe.php?book=` 또는 `POST recipe.php` (`method=simple`) |
//! | 원문 이미지 | `GET print_org_img.php` |
//! | 유사 주방문 | `GET anal1.php` |

#![allow(clippy::uninlined_format_args)]

use async_trait::async_trait;
use tracing::debug;

use super::config::UpstreamConfig;
use super::error::{KoreansoolError, KoreansoolResult};
use super::http_client::{HttpClient, HttpClientConfig};

const TABLE_ENDPOINT: &str = "print_table.php";
const RECIPE_ENDPOINT: &str = "recipe.php";
const IMAGE_ENDPOINT: &str = "print_org_img.php";
const SIMILAR_ENDPOINT: &str = "anal1.php";

/// Upstream sentinel for an absent form value
pub const ABSENT: &str = "@";

/// Raw documents of the archive, one call per logical query
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    async fn search(&self, text: &str) -> KoreansoolResult<String>;

    async fn books(&self) -> KoreansoolResult<String>;

    async fn references(&self) -> KoreansoolResult<String>;

    /// Recipe page for any combination of book / liquor / dup
    async fn recipe(&self, book: Option<&str>, liquor: Option<&str>, dup: Option<u32>) -> KoreansoolResult<String>;

    /// Scanned original page; `dup` defaults to 1
    async fn image(&self, book: &str, liquor: &str, dup: Option<u32>) -> KoreansoolResult<Vec<u8>>;

    async fn similar_recipes(&self, book: &str, liquor: &str, dup: u32) -> KoreansoolResult<String>;
}

/// How `recipe.php` is queried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeRequest {
    /// Book only: plain GET
    Book(String),
    /// Anything else: POST form `method=simple`
    Form(Vec<(&'static str, String)>),
}

impl RecipeRequest {
    pub fn new(book: Option<&str>, liquor: Option<&str>, dup: Option<u32>) -> Self {
        let book = book.filter(|book| !book.is_empty());
        let liquor = liquor.filter(|liquor| !liquor.is_empty());

        if let (Some(book), None) = (book, liquor) {
            return Self::Book(book.to_string());
        }

        // dup 은 book 과 liq 가 모두 있을 때만 의미가 있음
        let dup = match (book, liquor, dup) {
            (Some(_), Some(_), Some(dup)) if dup > 0 => dup.to_string(),
            _ => ABSENT.to_string(),
        };

        Self::Form(vec![
            ("method", "simple".to_string()),
            ("book", book.unwrap_or(ABSENT).to_string()),
            ("liq", liquor.unwrap_or(ABSENT).to_string()),
            ("dup", dup),
        ])
    }
}

/// [`UpstreamSource`] backed by the live archive
pub struct KoreansoolClient {
    http: HttpClient,
    base_url: String,
}

impl KoreansoolClient {
    pub fn new(upstream: &UpstreamConfig) -> anyhow::Result<Self> {
        Ok(Self::with_http_client(
            HttpClient::new(HttpClientConfig::from(upstream))?,
            &upstream.base_url,
        ))
    }

    pub fn with_http_client(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn table(&self, table: &str, extra: Option<(&str, String)>) -> KoreansoolResult<String> {
        let mut query = vec![("table", table.to_string())];
        query.extend(extra);
        self.http.get_text(&self.endpoint(TABLE_ENDPOINT), &query).await
    }
}

fn identity_query(book: &str, liquor: &str, dup: u32) -> Vec<(&'static str, String)> {
    vec![
        ("book", book.to_string()),
        ("liq", liquor.to_string()),
        ("dup", dup.to_string()),
    ]
}

#[async_trait]
impl UpstreamSource for KoreansoolClient {
    async fn search(&self, text: &str) -> KoreansoolResult<String> {
        self.table("SEARCH", Some(("_search_txt", text.to_string()))).await
    }

    async fn books(&self) -> KoreansoolResult<String> {
        self.table("book", None).await
    }

    async fn references(&self) -> KoreansoolResult<String> {
        self.table("ref", None).await
    }

    async fn recipe(&self, book: Option<&str>, liquor: Option<&str>, dup: Option<u32>) -> KoreansoolResult<String> {
        let url = self.endpoint(RECIPE_ENDPOINT);
        match RecipeRequest::new(book, liquor, dup) {
            RecipeRequest::Book(book) => self.http.get_text(&url, &[("book", book)]).await,
            RecipeRequest::Form(form) => {
                debug!("POST {} {:?}", url, form);
                self.http.post_form_text(&url, &form).await
            }
        }
    }

    async fn image(&self, book: &str, liquor: &str, dup: Option<u32>) -> KoreansoolResult<Vec<u8>> {
        if book.is_empty() || liquor.is_empty() {
            return Err(KoreansoolError::invalid_query("book and liq are required for the original image"));
        }

        let query = identity_query(book, liquor, dup.unwrap_or(1));
        self.http.get_bytes(&self.endpoint(IMAGE_ENDPOINT), &query).await
    }

    async fn similar_recipes(&self, book: &str, liquor: &str, dup: u32) -> KoreansoolResult<String> {
        let query = identity_query(book, liquor, dup);
        self.http.get_text(&self.endpoint(SIMILAR_ENDPOINT), &query).await
    }
}
