//! Original-text / translation locator
//!
//! 원문(`id_text_org_N`)과 해석(`id_text_trs_N`)은 "원문 보기" 토글로 숨겨진 블록이고,
//! 페이지마다 위치가 다릅니다. 테이블 내부 → 다음 형제 → 부모 → 테이블 이후 문서 순으로 찾습니다.

use scraper::{ElementRef, Html};

use super::config::RecipeSelectorSet;
use super::dom::{elements_from, NodeExt};
use super::fallback::{first_success, Tier};
use super::patterns::Patterns;

const ORIGINAL_ID_PREFIX: &str = "id_text_org_";
const TRANSLATION_ID_PREFIX: &str = "id_text_trs_";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginalTexts {
    pub original_text: Option<String>,
    pub original_text_translation: Option<String>,
}

/// Toggle index from `ToggleText(this,N)` of the toggle button; defaults to 1
pub fn toggle_index(scope: Option<ElementRef<'_>>, selectors: &RecipeSelectorSet, patterns: &Patterns) -> u32 {
    scope
        .and_then(|scope| scope.find_first(&selectors.toggle_button))
        .and_then(|button| {
            patterns
                .toggle_index
                .captures(button.attr_or_empty("onclick"))
                .and_then(|caps| caps[1].parse().ok())
        })
        .unwrap_or(1)
}

/// What one search looks for, relative to one recipe block
struct Search<'a> {
    block: ElementRef<'a>,
    document: &'a Html,
    exact_id: String,
    id_prefix: &'static str,
    min_text_length: usize,
}

impl<'a> Search<'a> {
    fn accept(&self, element: ElementRef<'a>) -> Option<String> {
        let text = element.trimmed_text();
        (text.chars().count() > self.min_text_length).then_some(text)
    }

    fn exact_in(&self, candidates: &[ElementRef<'a>]) -> Option<String> {
        candidates
            .iter()
            .find(|element| element.value().id() == Some(self.exact_id.as_str()))
            .and_then(|element| self.accept(*element))
    }

    fn prefixed_in(&self, candidates: &[ElementRef<'a>]) -> Option<String> {
        candidates
            .iter()
            .find(|element| element.value().id().is_some_and(|id| id.starts_with(self.id_prefix)))
            .and_then(|element| self.accept(*element))
    }

    /// Exact id first, then any id sharing the prefix
    fn exact_or_prefixed_in(&self, scope: ElementRef<'a>) -> Option<String> {
        let candidates = scope.self_and_descendants();
        self.exact_in(&candidates).or_else(|| self.prefixed_in(&candidates))
    }
}

fn in_block(search: &Search<'_>) -> Option<String> {
    search.exact_or_prefixed_in(search.block)
}

fn in_next_sibling(search: &Search<'_>) -> Option<String> {
    search.exact_or_prefixed_in(search.block.next_element()?)
}

fn in_parent(search: &Search<'_>) -> Option<String> {
    let parent = search.block.parent_element()?;
    search.exact_in(&parent.self_and_descendants())
}

fn after_block(search: &Search<'_>) -> Option<String> {
    search.exact_in(&elements_from(search.document, search.block))
}

fn locate(search: &Search<'_>) -> Option<String> {
    let tiers: [Tier<Search<'_>, String>; 4] = [
        Tier::new("inside block", in_block),
        Tier::new("next sibling", in_next_sibling),
        Tier::new("parent", in_parent),
        Tier::new("document after block", after_block),
    ];
    first_success(search, &tiers)
}

/// Locate the original text and its translation for the block with toggle `index`.
pub fn locate_original_texts(
    block: ElementRef<'_>,
    document: &Html,
    index: u32,
    min_text_length: usize,
) -> OriginalTexts {
    let search = |id_prefix: &'static str| Search {
        block,
        document,
        exact_id: format!("{id_prefix}{index}"),
        id_prefix,
        min_text_length,
    };

    OriginalTexts {
        original_text: locate(&search(ORIGINAL_ID_PREFIX)),
        original_text_translation: locate(&search(TRANSLATION_ID_PREFIX)),
    }
}
