//! Book list parser (`print_table.php?table=book`)

#![allow(clippy::uninlined_format_args)]

use std::sync::Arc;

use anyhow::Result;
use scraper::Html;
use tracing::debug;

use super::book_row::parse_book_cell;
use super::config::{ListSelectorSet, ParsingConfig};
use super::dom::NodeExt;
use super::patterns::Patterns;
use super::HtmlParser;
use crate::domain::Book;

/// Parser for the two-column book list table
pub struct BookListParser {
    selectors: ListSelectorSet,
    patterns: Arc<Patterns>,
}

impl BookListParser {
    pub fn new() -> Result<Self> {
        Self::with_config(&ParsingConfig::default(), Arc::new(Patterns::compile()?))
    }

    pub fn with_config(config: &ParsingConfig, patterns: Arc<Patterns>) -> Result<Self> {
        Ok(Self {
            selectors: ListSelectorSet::compile(&config.list_selectors)?,
            patterns,
        })
    }
}

impl HtmlParser for BookListParser {
    type Output = Vec<Book>;

    fn parse(&self, html: &Html) -> Self::Output {
        let rows = html.root_element().find_all(&self.selectors.row);
        let mut books = Vec::new();

        for row in rows {
            let cells = row.find_all(&self.selectors.cell);
            let Some(info_cell) = cells.get(1) else {
                continue;
            };
            if info_cell.trimmed_text().is_empty() {
                continue;
            }

            let book = parse_book_cell(*info_cell, &self.selectors, &self.patterns);
            if book.has_name() {
                books.push(book);
            } else {
                debug!("Skipping book row without a name");
            }
        }

        debug!("Successfully extracted {} books", books.len());
        books
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_need_two_cells_and_a_name() {
        let parser = BookListParser::new().unwrap();
        let html = Html::parse_document(
            r#"<table>
                 <tr><td colspan="2"><b>문헌 목록</b></td></tr>
                 <tr><td>1</td><td><a href="r.php?book=고려도경">고려도경</a>(高麗圖經)<br>서긍(徐兢) 1123년<br>고려 풍속 기록</td></tr>
                 <tr><td>2</td><td>   </td></tr>
                 <tr><td>3</td><td>이름 없는 문헌<br>미상</td></tr>
               </table>"#,
        );

        let books = parser.parse(&html);

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "고려도경");
        assert_eq!(books[0].year, Some(1123));
    }
}
