//! Title/identity extraction
//!
//! Resolves the (book, liquor) pair of a recipe block from its title row.
//! Never fails: an empty pair tells the caller to drop the block.

use scraper::ElementRef;

use super::config::RecipeSelectorSet;
use super::dom::NodeExt;
use super::fallback::{first_success, Tier};
use super::patterns::Patterns;
use crate::domain::RecipeInfo;

/// Book / liquor pair resolved from a title row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub book: String,
    pub liquor: String,
}

impl Identity {
    pub fn new(book: impl Into<String>, liquor: impl Into<String>) -> Self {
        Self {
            book: book.into(),
            liquor: liquor.into(),
        }
    }

    /// Both sides unresolved; the block carries no usable identity
    pub fn is_unresolved(&self) -> bool {
        self.book.is_empty() && self.liquor.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        !self.book.is_empty() && !self.liquor.is_empty()
    }
}

/// Title row of a recipe block together with what it resolved to
#[derive(Debug, Clone)]
pub struct TitleRow<'a> {
    pub row: Option<ElementRef<'a>>,
    pub identity: Identity,
    pub dup: u32,
}

const TITLE_SPLITS: [Tier<str, Identity>; 3] = [
    Tier::new("dash separator", split_on_dash_separator),
    Tier::new("separator runs", split_on_separator_runs),
    Tier::new("first whitespace", split_on_first_whitespace),
];

/// Split plain title text into (book, liquor).
///
/// `"B - L"` splits exactly; otherwise the first whitespace/hyphen-separated
/// token is the book. Text that cannot be split becomes the liquor.
pub fn split_title(title: &str) -> Identity {
    if title.is_empty() {
        return Identity::default();
    }

    first_success(title, &TITLE_SPLITS).unwrap_or_else(|| Identity::new("", title.trim()))
}

fn split_on_dash_separator(title: &str) -> Option<Identity> {
    let parts: Vec<&str> = title.split(" - ").collect();
    match parts.as_slice() {
        [book, liquor] => Some(Identity::new(book.trim(), liquor.trim())),
        _ => None,
    }
}

fn split_on_separator_runs(title: &str) -> Option<Identity> {
    let mut parts = title.split(|c: char| c.is_whitespace() || c == '-');
    let first = parts.next()?.trim();
    let rest = parts.filter(|part| !part.is_empty()).collect::<Vec<_>>().join(" ");

    (!first.is_empty() && !rest.is_empty()).then(|| Identity::new(first, rest))
}

fn split_on_first_whitespace(title: &str) -> Option<Identity> {
    let trimmed = title.trim();
    let (left, right) = trimmed.split_once(char::is_whitespace)?;
    let right = right.trim();

    (!left.is_empty() && !right.is_empty()).then(|| Identity::new(left, right))
}

/// Resolve identity from the title row's link texts and its plain text.
///
/// - two or more links: link 0 is the book, link 1 the liquor
/// - one link: split the text, then put the link on the side it matches (book by default)
/// - no link: split the text
pub fn resolve_identity(link_texts: &[String], text: &str) -> Identity {
    match link_texts {
        [book, liquor, ..] => Identity::new(book.trim(), liquor.trim()),
        [link] => {
            let link = link.trim();
            let parsed = split_title(text);

            if !parsed.liquor.is_empty() && parsed.book != link && parsed.liquor == link {
                Identity::new(parsed.book, link)
            } else {
                Identity::new(link, parsed.liquor)
            }
        }
        [] => split_title(text),
    }
}

/// `dup` of a block: the liquor link's `dup=` parameter, else a trailing number in its `target`.
pub fn extract_dup(anchors: &[ElementRef<'_>], patterns: &Patterns) -> u32 {
    let Some(liquor_link) = anchors.get(1) else {
        return RecipeInfo::DEFAULT_DUP;
    };

    let from_href = patterns
        .dup_param
        .captures(liquor_link.attr_or_empty("href"))
        .and_then(|caps| caps[1].parse().ok());

    from_href
        .or_else(|| {
            patterns
                .trailing_number
                .captures(liquor_link.attr_or_empty("target"))
                .and_then(|caps| caps[1].parse().ok())
        })
        .unwrap_or(RecipeInfo::DEFAULT_DUP)
}

/// Locate the title row of `block` and resolve its identity and `dup`.
///
/// `.tr_rcp_title` is preferred; without one, the first row's first cell is the title.
pub fn extract_title_row<'a>(
    block: ElementRef<'a>,
    selectors: &RecipeSelectorSet,
    patterns: &Patterns,
) -> TitleRow<'a> {
    if let Some(row) = block.find_first(&selectors.title_row) {
        let anchors = row.find_all(&selectors.anchor);
        let link_texts: Vec<String> = anchors.iter().map(NodeExt::trimmed_text).collect();
        let text: String = row
            .find_all(&selectors.cell)
            .iter()
            .map(NodeExt::text_content)
            .collect();

        return TitleRow {
            row: Some(row),
            identity: resolve_identity(&link_texts, text.trim()),
            dup: extract_dup(&anchors, patterns),
        };
    }

    let row = block.find_first(&selectors.first_row);
    let text = row
        .and_then(|row| row.find_first(&selectors.cell))
        .map(|cell| cell.trimmed_text())
        .unwrap_or_default();
    let anchors = row.map(|row| row.find_all(&selectors.anchor)).unwrap_or_default();

    TitleRow {
        row,
        identity: split_title(&text),
        dup: extract_dup(&anchors, patterns),
    }
}
