//! Meta-info extraction from a recipe title row
//!
//! 제목 행에는 술 이름 한자, 상세 주방문 링크, `[태그]`, 설명, 별칭, 유사 문헌이
//! 자유 텍스트로 섞여 있습니다. 각 항목은 서로 독립적으로 추출되며,
//! 패턴이 없으면 해당 필드만 비워 둡니다.

use scraper::{ElementRef, Html};
use url::form_urlencoded;

use super::config::RecipeSelectorSet;
use super::dom::NodeExt;
use super::patterns::Patterns;
use crate::domain::{DetailRecipeLink, DetailRecipeParams, RecipeMeta};

/// Everything after this marker belongs to the original-text widget, not the title
const ORG_TEXT_MARKER: &str = r#"<span class="org_text_and_error""#;

/// Self-referential single-recipe endpoint of the API layer
pub const DETAIL_RECIPE_HREF: &str = "/api/koreansool/recipes";

const RECIPE_ENDPOINT: &str = "recipe.php";
const ABSENT_SENTINEL: &str = "@";

/// Anchors inside the tag bracket that are navigation, not tags
const TAG_LINK_KEYWORDS: [&str; 5] = ["원본", "참조", "유사", "anal", "kfood-view"];
const NON_TAG_TOKENS: [&str; 3] = ["원본", "유사", "참조"];

const NOTICE_GLYPHS: [char; 2] = ['⚠', '\u{FE0F}'];

/// Derive all optional metadata from a title row
pub fn extract_meta_info(title_row: ElementRef<'_>, selectors: &RecipeSelectorSet, patterns: &Patterns) -> RecipeMeta {
    let markup = title_row.inner_html();
    let content = truncate_before_original_text(&markup);
    let fragment = Html::parse_fragment(content);
    let root = fragment.root_element();

    let mut meta = RecipeMeta {
        liquor_hanja: extract_liquor_hanja(root, selectors, patterns),
        detail_recipe: extract_detail_recipe(root, selectors),
        tags: extract_tags(content, patterns),
        ..RecipeMeta::default()
    };

    // 설명/별칭은 마크업에 태그 괄호가 있을 때만 추출
    if patterns
        .bracket_group
        .find(content)
        .is_some_and(|bracket| bracket.start() > 0)
    {
        let text = root.text_without(|element| element.matches_any(&selectors.detail_anchor));
        if let Some(split) = split_around_bracket(&text, patterns) {
            meta.description = extract_description(&split, patterns);
            let (alias, similar_book) = extract_alias_and_similar_book(split.after, patterns);
            meta.alias = alias;
            meta.similar_book = similar_book;
        }
    }

    meta
}

fn truncate_before_original_text(markup: &str) -> &str {
    match markup.find(ORG_TEXT_MARKER) {
        Some(index) if index > 0 => &markup[..index],
        _ => markup,
    }
}

/// Hanja in parentheses of the first `상세 주방문` link, accepted only with a CJK ideograph
fn extract_liquor_hanja(root: ElementRef<'_>, selectors: &RecipeSelectorSet, patterns: &Patterns) -> Option<String> {
    let link_text = root.find_first(&selectors.hanja_anchor)?.trimmed_text();
    let hanja = patterns.paren_group.captures(&link_text)?[1].trim().to_string();

    patterns.cjk_ideograph.is_match(&hanja).then_some(hanja)
}

/// Last `상세 주방문` link pointing at the recipe endpoint, as a self-referential descriptor
fn extract_detail_recipe(root: ElementRef<'_>, selectors: &RecipeSelectorSet) -> Option<DetailRecipeLink> {
    let anchor = root.find_all(&selectors.detail_anchor).pop()?;
    let href = anchor.attr_or_empty("href");
    if !href.contains(RECIPE_ENDPOINT) {
        return None;
    }

    let params = parse_detail_params(href)?;
    Some(DetailRecipeLink {
        href: DETAIL_RECIPE_HREF.to_string(),
        params,
    })
}

/// `book`/`liq`/`dup` of a recipe link; `@` is the upstream sentinel for "absent"
pub fn parse_detail_params(href: &str) -> Option<DetailRecipeParams> {
    let query = href
        .split_once('?')
        .map(|(_, rest)| rest.split('#').next().unwrap_or_default())
        .unwrap_or_default();

    let mut book = None;
    let mut liquor = None;
    let mut dup = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let slot = match key.as_ref() {
            "book" => &mut book,
            "liq" => &mut liquor,
            "dup" => &mut dup,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    let present = |value: Option<String>| value.filter(|v| !v.is_empty() && v != ABSENT_SENTINEL);

    Some(DetailRecipeParams {
        book: present(book)?,
        liquor: present(liquor)?,
        dup: present(dup).and_then(|dup| dup.parse().ok()),
    })
}

/// Comma-separated tags of the first `[...]` group, navigation links removed
fn extract_tags(content: &str, patterns: &Patterns) -> Option<Vec<String>> {
    let tags_markup = patterns.bracket_group.captures(content)?.get(1)?.as_str();

    let fragment = Html::parse_fragment(tags_markup);
    let text = fragment.root_element().text_without(|element| {
        element.value().name() == "a"
            && TAG_LINK_KEYWORDS.iter().any(|keyword| {
                element.attr_or_empty("href").contains(keyword) || element.attr_or_empty("target").contains(keyword)
            })
    });

    let mut tags: Vec<String> = Vec::new();
    for tag in text.split(',').map(str::trim) {
        if tag.is_empty() || NON_TAG_TOKENS.contains(&tag) || tags.iter().any(|seen| seen == tag) {
            continue;
        }
        tags.push(tag.to_string());
    }

    (!tags.is_empty()).then_some(tags)
}

/// Title text split around its tag bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BracketSplit<'t> {
    before: &'t str,
    after: &'t str,
}

fn split_around_bracket<'t>(text: &'t str, patterns: &Patterns) -> Option<BracketSplit<'t>> {
    let bracket = patterns.bracket_group.find(text).filter(|bracket| bracket.start() > 0)?;

    Some(BracketSplit {
        before: &text[..bracket.start()],
        after: &text[bracket.end()..],
    })
}

/// Free text around the tags; the leading book and liquor tokens are dropped
fn extract_description(split: &BracketSplit<'_>, patterns: &Patterns) -> Option<String> {
    let without_ordinal = patterns.leading_ordinal.replace(split.before.trim_start(), "");
    let cleaned_before = patterns.paren_group.replace_all(&without_ordinal, "");
    let mut description = cleaned_before
        .split_whitespace()
        .skip(2)
        .collect::<Vec<_>>()
        .join(" ");

    let cleaned_after = split.after.replace('☞', "");
    let cleaned_after = cleaned_after.trim();
    let trailing = match patterns.similar_book.find(cleaned_after) {
        Some(similar) => cleaned_after[..similar.start()].trim(),
        None => cleaned_after,
    };

    if !trailing.is_empty() {
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(trailing);
    }

    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}

/// `유사:《…》` → similar book; the text before it → alias
fn extract_alias_and_similar_book(after: &str, patterns: &Patterns) -> (Option<String>, Option<String>) {
    let similar = patterns.similar_book.captures(after);

    let similar_book = similar
        .as_ref()
        .and_then(|caps| caps.get(1))
        .map(|book| book.as_str().trim().to_string())
        .filter(|book| !book.is_empty());

    let alias_text = match similar.as_ref().and_then(|caps| caps.get(0)) {
        Some(whole) => &after[..whole.start()],
        None => after,
    };
    let alias = patterns
        .collapse_whitespace(alias_text)
        .replace(&NOTICE_GLYPHS[..], "")
        .trim()
        .to_string();

    ((!alias.is_empty()).then_some(alias), similar_book)
}
