//! Reference list parser (`print_table.php?table=ref`)

use anyhow::Result;
use scraper::Html;
use tracing::debug;

use super::config::{ListSelectorSet, ParsingConfig};
use super::dom::NodeExt;
use super::HtmlParser;
use crate::domain::Reference;

const CELL_SEPARATOR: &str = " | ";

/// Parser for the loosely structured references table
pub struct ReferenceListParser {
    selectors: ListSelectorSet,
}

impl ReferenceListParser {
    pub fn new() -> Result<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    pub fn with_config(config: &ParsingConfig) -> Result<Self> {
        Ok(Self {
            selectors: ListSelectorSet::compile(&config.list_selectors)?,
        })
    }
}

impl HtmlParser for ReferenceListParser {
    type Output = Vec<Reference>;

    fn parse(&self, html: &Html) -> Self::Output {
        let mut references = Vec::new();

        for row in html.root_element().find_all(&self.selectors.row) {
            let cells: Vec<String> = row
                .find_all(&self.selectors.cell)
                .iter()
                .map(NodeExt::trimmed_text)
                .collect();

            // 헤더 행은 <b> 로 표시됨
            if cells.is_empty() || row.find_first(&self.selectors.header_marker).is_some() {
                continue;
            }

            let content = cells.join(CELL_SEPARATOR);
            let (title, link) = match row.find_first(&self.selectors.anchor) {
                Some(anchor) => {
                    let text = anchor.trimmed_text();
                    let title = if text.is_empty() { content.clone() } else { text };
                    (title, anchor.value().attr("href").map(str::to_string))
                }
                None => (cells[0].clone(), None),
            };

            let reference = Reference {
                title: Some(title).filter(|title| !title.is_empty()),
                content: Some(content).filter(|content| !content.is_empty()),
                category: None,
                link: link.filter(|link| !link.is_empty()),
            };

            if !reference.is_empty() {
                references.push(reference);
            }
        }

        debug!("Successfully extracted {} references", references.len());
        references
    }
}
