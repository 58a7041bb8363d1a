//! Book-row parser
//!
//! 문헌 목록의 두 번째 셀은 다음과 같은 형태입니다:
//! `<a href=..>고려도경</a>(高麗圖經)<br>서긍(徐兢) 1123년<br>고려 풍속 기록 <a target="원본">원본</a>`

use scraper::ElementRef;

use super::config::ListSelectorSet;
use super::dom::{fragment_text_without_anchors, NodeExt};
use super::fallback::{first_success, Tier};
use super::patterns::Patterns;
use crate::domain::Book;

const ORIGINAL_LINK_KEYWORDS: [&str; 2] = ["원본", "책원본"];
const REFERENCE_LINK_KEYWORDS: [&str; 2] = ["참조", "책참조"];
const LINE_BREAK: &str = "<br>";

/// Parse the descriptive cell of a book-list row
pub fn parse_book_cell(cell: ElementRef<'_>, selectors: &ListSelectorSet, patterns: &Patterns) -> Book {
    let markup = cell.inner_html();
    let anchors = cell.find_all(&selectors.anchor);

    let mut book = Book::default();
    if let Some(name_link) = anchors.first() {
        book.name = name_link.trimmed_text();
        book.recipe_link = name_link.value().attr("href").map(str::to_string);
    }

    book.name_hanja = patterns
        .book_hanja
        .captures(&markup)
        .map(|caps| caps[2].trim().to_string())
        .filter(|hanja| !hanja.is_empty());

    if let Some(fragment) = author_year_fragment(&markup, patterns) {
        let author_year = parse_author_year(&fragment, patterns);
        book.author = author_year.author;
        book.author_hanja = author_year.author_hanja;
        book.year = author_year.year;
    }

    book.original_link = find_link(&anchors, &ORIGINAL_LINK_KEYWORDS);
    book.reference_link = find_link(&anchors, &REFERENCE_LINK_KEYWORDS);

    let line_breaks = cell.find_all(&selectors.line_break).len();
    book.description = description_text(&markup, line_breaks, patterns)
        .map(|text| clean_description(&text, &book, patterns))
        .filter(|text| !text.is_empty());

    book
}

/// Text between the first and second line break (or after the only one), links removed
fn author_year_fragment(markup: &str, patterns: &Patterns) -> Option<String> {
    let lines: Vec<&str> = patterns.line_break.split(markup).collect();

    let text = match lines.as_slice() {
        [_, second, _, ..] => {
            let text = fragment_text_without_anchors(second).trim().to_string();
            if text.is_empty() {
                strip_tags(second, patterns)
            } else {
                text
            }
        }
        [_, second] => {
            let first_line = |text: &str| text.lines().next().unwrap_or_default().trim().to_string();
            let text = first_line(fragment_text_without_anchors(second).trim());
            if text.is_empty() {
                first_line(&strip_tags(second, patterns))
            } else {
                text
            }
        }
        _ => return None,
    };

    (!text.is_empty()).then_some(text)
}

fn strip_tags(markup: &str, patterns: &Patterns) -> String {
    patterns.html_tag.replace_all(markup, "").trim().to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorYear {
    pub author: Option<String>,
    pub author_hanja: Option<String>,
    pub year: Option<u32>,
}

/// Input shared by the author/year tiers
struct AuthorYearInput<'a> {
    text: String,
    patterns: &'a Patterns,
}

/// Split `서긍(徐兢) 1123년`-style text into author, hanja and year.
pub fn parse_author_year(text: &str, patterns: &Patterns) -> AuthorYear {
    let cleaned = patterns.leading_punctuation.replace(text, "");
    let input = AuthorYearInput {
        text: patterns.collapse_whitespace(&cleaned),
        patterns,
    };

    let tiers: [Tier<AuthorYearInput<'_>, AuthorYear>; 4] = [
        Tier::new("author(hanja) year", full_pattern),
        Tier::new("year only", year_only),
        Tier::new("author(hanja)", author_with_hanja),
        Tier::new("plain author", plain_author),
    ];
    first_success(&input, &tiers).unwrap_or_default()
}

fn full_pattern(input: &AuthorYearInput<'_>) -> Option<AuthorYear> {
    input.patterns.author_hanja_year.iter().find_map(|pattern| {
        let caps = pattern.captures(&input.text)?;
        Some(AuthorYear {
            author: Some(caps[1].trim().to_string()),
            author_hanja: Some(caps[2].trim().to_string()),
            year: caps[3].parse().ok(),
        })
    })
}

/// Year anywhere in the text; whatever precedes it is the author
fn year_only(input: &AuthorYearInput<'_>) -> Option<AuthorYear> {
    let (year, start) = match_year(&input.text, input.patterns)?;
    let before_year = input.text[..start].trim();

    let mut result = AuthorYear {
        year: Some(year),
        ..AuthorYear::default()
    };
    if before_year.is_empty() {
        return Some(result);
    }

    match input.patterns.author_hanja.captures(before_year) {
        Some(caps) => {
            result.author = Some(caps[1].trim().to_string());
            result.author_hanja = Some(caps[2].trim().to_string());
        }
        None => result.author = Some(before_year.to_string()),
    }
    Some(result)
}

fn author_with_hanja(input: &AuthorYearInput<'_>) -> Option<AuthorYear> {
    let caps = input.patterns.author_hanja.captures(&input.text)?;
    Some(AuthorYear {
        author: Some(caps[1].trim().to_string()),
        author_hanja: Some(caps[2].trim().to_string()),
        year: None,
    })
}

fn plain_author(input: &AuthorYearInput<'_>) -> Option<AuthorYear> {
    let author = input.text.trim();
    (!author.is_empty()).then(|| AuthorYear {
        author: Some(author.to_string()),
        ..AuthorYear::default()
    })
}

/// Year value and the byte offset where it starts
fn match_year(text: &str, patterns: &Patterns) -> Option<(u32, usize)> {
    let from_patterns = patterns.year.iter().find_map(|pattern| {
        let caps = pattern.captures(text)?;
        let number = caps.get(1)?;
        Some((number.as_str().parse().ok()?, number.start()))
    });
    if from_patterns.is_some() {
        return from_patterns;
    }

    // 숫자 뒤 두 글자 안에 '년'이 오는 경우
    let number = patterns.bare_year_number.find(text)?;
    let year_char = text.find('년')?;
    let gap = text.get(number.end()..year_char)?;

    (gap.chars().count() <= 2)
        .then(|| number.as_str().parse().ok().map(|year| (year, number.start())))
        .flatten()
}

/// First anchor whose `target` names a keyword, else whose target/title/text does
fn find_link(anchors: &[ElementRef<'_>], keywords: &[&str]) -> Option<String> {
    let by_target = |anchor: &ElementRef<'_>| {
        let target = anchor.attr_or_empty("target");
        keywords.iter().any(|keyword| target.contains(keyword))
    };
    let by_any = |anchor: &ElementRef<'_>| {
        let title = anchor.attr_or_empty("title");
        let text = anchor.trimmed_text();
        by_target(anchor)
            || keywords
                .iter()
                .any(|keyword| title.contains(&format!("{keyword} 보기")) || text == *keyword)
    };

    anchors
        .iter()
        .find(|anchor| by_target(anchor))
        .or_else(|| anchors.iter().find(|anchor| by_any(anchor)))
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
}

/// Text after a `<br><br>` pair, else after the second `<br>`
fn description_text(markup: &str, line_breaks: usize, patterns: &Patterns) -> Option<String> {
    if let Some(double_break) = patterns.double_line_break.find(markup) {
        let text = fragment_text_without_anchors(&markup[double_break.end()..]);
        return Some(text.trim().to_string());
    }

    if line_breaks < 2 {
        return None;
    }

    let (_, after_first) = markup.split_once(LINE_BREAK)?;
    let (_, after_second) = after_first.split_once(LINE_BREAK)?;
    Some(fragment_text_without_anchors(after_second).trim().to_string())
}

/// Drop author / hanja / year text the description repeats
fn clean_description(description: &str, book: &Book, patterns: &Patterns) -> String {
    let mut cleaned = description.to_string();

    if let Some(author) = book.author.as_deref().filter(|author| !author.is_empty()) {
        if let Some(hanja) = book.author_hanja.as_deref().filter(|hanja| !hanja.is_empty()) {
            let full = format!(r"{}\s*\({}\)", regex::escape(author), regex::escape(hanja));
            if let Ok(full) = regex::Regex::new(&full) {
                cleaned = full.replace_all(&cleaned, "").trim().to_string();
            }
        }
        cleaned = cleaned.replace(author, "").trim().to_string();
        if let Some(hanja) = book.author_hanja.as_deref().filter(|hanja| !hanja.is_empty()) {
            cleaned = cleaned.replace(hanja, "").trim().to_string();
        }
    }

    if let Some(year) = book.year {
        cleaned = cleaned.replace(&format!("{year}년"), "").trim().to_string();
    }

    patterns.collapse_whitespace(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::config::ParsingConfig;
    use rstest::rstest;
    use scraper::{Html, Selector};

    fn parse_cell(cell_html: &str) -> Book {
        let patterns = Patterns::compile().unwrap();
        let selectors = ListSelectorSet::compile(&ParsingConfig::default().list_selectors).unwrap();
        let document = Html::parse_document(&format!("<table><tr><td>1</td><td>{cell_html}</td></tr></table>"));
        let cell = document.select(&Selector::parse("td").unwrap()).nth(1).unwrap();

        parse_book_cell(cell, &selectors, &patterns)
    }

    #[test]
    fn test_full_book_cell() {
        let book = parse_cell(r#"<a href="X">고려도경</a>(高麗圖經)<br>서긍(徐兢) 1123년<br>고려 풍속 기록"#);

        assert_eq!(book.name, "고려도경");
        assert_eq!(book.name_hanja.as_deref(), Some("高麗圖經"));
        assert_eq!(book.author.as_deref(), Some("서긍"));
        assert_eq!(book.author_hanja.as_deref(), Some("徐兢"));
        assert_eq!(book.year, Some(1123));
        assert_eq!(book.description.as_deref(), Some("고려 풍속 기록"));
        assert_eq!(book.recipe_link.as_deref(), Some("X"));
    }

    #[test]
    fn test_book_links_by_target_and_text() {
        let book = parse_cell(
            r#"<a href="r.php">산가요록</a><br>전순의 1450년<br>
               <a href="org.php" target="책원본">보기</a> <a href="ref.php">참조</a>"#,
        );

        assert_eq!(book.original_link.as_deref(), Some("org.php"));
        assert_eq!(book.reference_link.as_deref(), Some("ref.php"));
        assert_eq!(book.author.as_deref(), Some("전순의"));
        assert_eq!(book.year, Some(1450));
    }

    #[test]
    fn test_description_after_double_break_removes_repeats() {
        let book = parse_cell(r#"<a href="r.php">수운잡방</a><br>김유(金綏)<br><br>김유(金綏)가 쓴 조리서"#);

        assert_eq!(book.author.as_deref(), Some("김유"));
        assert_eq!(book.year, None);
        assert_eq!(book.description.as_deref(), Some("가 쓴 조리서"));
    }

    #[test]
    fn test_cell_without_line_break() {
        let book = parse_cell(r#"<a href="r.php">주방문</a>"#);

        assert_eq!(book.name, "주방문");
        assert_eq!(book.author, None);
        assert_eq!(book.description, None);
    }

    #[rstest]
    #[case("서긍(徐兢) 1123년", Some("서긍"), Some("徐兢"), Some(1123))]
    #[case("서긍(徐兢)1123년 ", Some("서긍"), Some("徐兢"), Some(1123))]
    #[case(", 빙허각 이씨 1809년 경", Some("빙허각 이씨"), None, Some(1809))]
    #[case("1670년경", None, None, Some(1670))]
    #[case("안동 장씨(安東張氏)", Some("안동 장씨"), Some("安東張氏"), None)]
    #[case("미상", Some("미상"), None, None)]
    #[case("", None, None, None)]
    fn test_parse_author_year(
        #[case] text: &str,
        #[case] author: Option<&str>,
        #[case] hanja: Option<&str>,
        #[case] year: Option<u32>,
    ) {
        let patterns = Patterns::compile().unwrap();
        let parsed = parse_author_year(text, &patterns);

        assert_eq!(parsed.author.as_deref(), author);
        assert_eq!(parsed.author_hanja.as_deref(), hanja);
        assert_eq!(parsed.year, year);
    }

    #[test]
    fn test_year_followed_closely_by_marker() {
        let patterns = Patterns::compile().unwrap();
        assert_eq!(match_year("1540 -년", &patterns), Some((1540, 0)));
        assert_eq!(match_year("1540 이후 년", &patterns), None);
    }
}
