//! Command-line entry: one query, JSON envelope on stdout
//!
//! ```text
//! ko-drink [--config FILE] search <text> [--page N] [--limit N]
//! ko-drink [--config FILE] books|refs [--page N] [--limit N]
//! ko-drink [--config FILE] recipe [--book B] [--liq L] [--dup D] [--page N] [--limit N]
//! ko-drink [--config FILE] similar <book> <liq> [--dup D] [--page N] [--limit N]
//! ko-drink [--config FILE] image <book> <liq> [--dup D] --out FILE
//! ko-drink parse search|recipes|books|refs <saved.html>
//! ```

#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::application::{KoreansoolService, PageRequest, ParsingService, RecipeQuery};
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};
use crate::infrastructure::parsing::ParsingConfig;
use crate::infrastructure::{init_logging_with_config, AppConfig, KoreansoolClient};

/// Saved page kinds the offline `parse` command understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Search,
    Recipes,
    Books,
    References,
}

impl PageKind {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "search" => Ok(Self::Search),
            "recipes" => Ok(Self::Recipes),
            "books" => Ok(Self::Books),
            "refs" | "references" => Ok(Self::References),
            other => bail!("Unknown page kind '{}'", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search { text: String, page: PageRequest },
    Books { page: PageRequest },
    References { page: PageRequest },
    Recipe(RecipeQuery),
    Similar { book: String, liquor: String, dup: Option<u32>, page: PageRequest },
    Image { book: String, liquor: String, dup: Option<u32>, out: PathBuf },
    Parse { kind: PageKind, file: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub command: Command,
}

/// Flags may appear anywhere after the command name
#[derive(Default)]
struct Flags {
    positional: Vec<String>,
    config: Option<PathBuf>,
    page: Option<u32>,
    limit: Option<u32>,
    dup: Option<u32>,
    book: Option<String>,
    liquor: Option<String>,
    out: Option<PathBuf>,
}

impl Flags {
    fn collect(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut flags = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |name: &str| args.next().ok_or_else(|| anyhow!("{} needs a value", name));
            match arg.as_str() {
                "--config" => flags.config = Some(PathBuf::from(value("--config")?)),
                "--page" => flags.page = Some(parse_number("--page", &value("--page")?)?),
                "--limit" => flags.limit = Some(parse_number("--limit", &value("--limit")?)?),
                "--dup" => flags.dup = Some(parse_number("--dup", &value("--dup")?)?),
                "--book" => flags.book = Some(value("--book")?),
                "--liq" => flags.liquor = Some(value("--liq")?),
                "--out" => flags.out = Some(PathBuf::from(value("--out")?)),
                flag if flag.starts_with("--") => bail!("Unknown option '{}'", flag),
                _ => flags.positional.push(arg.clone()),
            }
        }

        Ok(flags)
    }

    fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

fn parse_number(name: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .with_context(|| format!("{} expects a positive number, got '{}'", name, value))
}

impl CliArgs {
    /// Parse arguments without the program name
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut flags = Flags::collect(args)?;
        if flags.positional.is_empty() {
            bail!("Missing command (search, books, refs, recipe, similar, image, parse)");
        }
        let name = flags.positional.remove(0);
        let mut positional = std::mem::take(&mut flags.positional).into_iter();
        let mut required = |what: &str| {
            positional
                .next()
                .ok_or_else(|| anyhow!("'{}' needs <{}>", name, what))
        };

        let command = match name.as_str() {
            "search" => Command::Search {
                text: required("text")?,
                page: flags.page(),
            },
            "books" => Command::Books { page: flags.page() },
            "refs" | "references" => Command::References { page: flags.page() },
            "recipe" => Command::Recipe(RecipeQuery {
                book: flags.book.take(),
                liquor: flags.liquor.take(),
                dup: flags.dup,
                page: flags.page(),
            }),
            "similar" => Command::Similar {
                book: required("book")?,
                liquor: required("liq")?,
                dup: flags.dup,
                page: flags.page(),
            },
            "image" => Command::Image {
                book: required("book")?,
                liquor: required("liq")?,
                dup: flags.dup,
                out: flags.out.take().ok_or_else(|| anyhow!("'image' needs --out FILE"))?,
            },
            "parse" => Command::Parse {
                kind: PageKind::parse(&required("kind")?)?,
                file: PathBuf::from(required("file")?),
            },
            other => bail!("Unknown command '{}'", other),
        };

        Ok(Self {
            config: flags.config,
            command,
        })
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
    Ok(())
}

/// Run one command to completion
pub async fn run(args: CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    init_logging_with_config(&config.logging)?;

    let parsing = Arc::new(ParsingService::new(ParsingConfig::default())?);

    if let Command::Parse { kind, file } = &args.command {
        let html = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        return match kind {
            PageKind::Search => print_json(&parsing.parse_search_results(&html)),
            PageKind::Recipes => print_json(&parsing.parse_all_recipes(&html)),
            PageKind::Books => print_json(&parsing.parse_books(&html)),
            PageKind::References => print_json(&parsing.parse_references(&html)),
        };
    }

    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("🛑 Interrupted, cancelling upstream request");
            ctrl_c_token.cancel();
        }
    });

    let http = HttpClient::new(HttpClientConfig::from(&config.upstream))?.with_cancellation(cancellation);
    let client = Arc::new(KoreansoolClient::with_http_client(http, &config.upstream.base_url));
    let service = KoreansoolService::new(client, parsing, config.pagination.clone());

    match args.command {
        Command::Search { text, page } => print_json(&service.search(&text, page).await?),
        Command::Books { page } => print_json(&service.books(page).await?),
        Command::References { page } => print_json(&service.references(page).await?),
        Command::Recipe(query) => print_json(&service.recipes(&query).await?),
        Command::Similar {
            book,
            liquor,
            dup,
            page,
        } => print_json(&service.similar_recipes(&book, &liquor, dup, page).await?),
        Command::Image { book, liquor, dup, out } => {
            let bytes = service.book_image(&book, &liquor, dup).await?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!("Saved {} bytes to {}", bytes.len(), out.display());
            Ok(())
        }
        Command::Parse { .. } => Ok(()),
    }
}
