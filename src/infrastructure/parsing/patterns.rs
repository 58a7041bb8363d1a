//! Compiled regex patterns for the free-text heuristics
//!
//! 패턴은 파서 생성 시 한 번만 컴파일되고, 순서가 중요한 패턴은 Vec 으로 보관합니다.

use anyhow::{Context, Result};
use regex::Regex;

/// All regexes the extraction pass needs, compiled once and shared
#[derive(Debug, Clone)]
pub struct Patterns {
    // title row
    pub toggle_index: Regex,
    pub dup_param: Regex,
    pub trailing_number: Regex,
    pub leading_number: Regex,

    // meta info
    pub paren_group: Regex,
    pub cjk_ideograph: Regex,
    pub bracket_group: Regex,
    pub leading_ordinal: Regex,
    pub similar_book: Regex,
    pub whitespace_run: Regex,

    // book row
    pub book_hanja: Regex,
    pub line_break: Regex,
    pub double_line_break: Regex,
    pub html_tag: Regex,
    pub leading_punctuation: Regex,
    /// `서긍(徐兢) 1123년` variants, tried in order
    pub author_hanja_year: Vec<Regex>,
    /// `1123년` variants, tried in order
    pub year: Vec<Regex>,
    pub bare_year_number: Regex,
    pub author_hanja: Regex,
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Failed to compile regex pattern '{name}'"))
}

impl Patterns {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            toggle_index: compile("toggle_index", r"ToggleText\(this,\s*(\d+)\)")?,
            dup_param: compile("dup_param", r"dup=(\d+)")?,
            trailing_number: compile("trailing_number", r"(\d+)$")?,
            leading_number: compile("leading_number", r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")?,

            paren_group: compile("paren_group", r"\(([^)]+)\)")?,
            cjk_ideograph: compile("cjk_ideograph", r"[\x{4E00}-\x{9FFF}]")?,
            bracket_group: compile("bracket_group", r"\[([^\]]+)\]")?,
            leading_ordinal: compile("leading_ordinal", r"^\d+\.\s*")?,
            similar_book: compile("similar_book", r"유사[：:]\s*《([^》]+)》")?,
            whitespace_run: compile("whitespace_run", r"\s+")?,

            book_hanja: compile("book_hanja", r"<a[^>]*>([^<]+)</a>\s*\(([^)]+)\)")?,
            line_break: compile("line_break", r"(?i)<br\s*/?>")?,
            double_line_break: compile("double_line_break", r"<br>\s*<br>")?,
            html_tag: compile("html_tag", r"<[^>]+>")?,
            leading_punctuation: compile("leading_punctuation", r"^[(),\s]+")?,
            author_hanja_year: vec![
                compile("author_hanja_year_spaced", r"^(.+?)\s*\(([^)]+)\)\s*(\d{3,4})\s*년\s*$")?,
                compile("author_hanja_year_tight", r"^(.+?)\s*\(([^)]+)\)\s*(\d{3,4})년\s*$")?,
                compile("author_hanja_year_spaced_end", r"^(.+?)\s*\(([^)]+)\)\s*(\d{3,4})\s*년$")?,
                compile("author_hanja_year_tight_end", r"^(.+?)\s*\(([^)]+)\)\s*(\d{3,4})년$")?,
            ],
            year: vec![
                compile("year_spaced", r"(\d{3,4})\s*년")?,
                compile("year_tight", r"(\d{3,4})년")?,
            ],
            bare_year_number: compile("bare_year_number", r"(\d{3,4})")?,
            author_hanja: compile("author_hanja", r"^(.+?)\s*\(([^)]+)\)\s*$")?,
        })
    }

    /// Leading float of `value` (JavaScript `parseFloat` semantics), truncated to a day count.
    pub fn parse_day(&self, value: &str) -> i32 {
        self.leading_number
            .find(value)
            .and_then(|m| m.as_str().trim().parse::<f64>().ok())
            .filter(|day| day.is_finite())
            // saturating float-to-int cast
            .map_or(0, |day| day.trunc() as i32)
    }

    /// Collapse every whitespace run to a single space
    pub fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace_run.replace_all(text, " ").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_patterns_compile() {
        assert!(Patterns::compile().is_ok());
    }

    #[rstest]
    #[case("3", 3)]
    #[case("3일", 3)]
    #[case("1.5", 1)]
    #[case("-2", -2)]
    #[case(".5", 0)]
    #[case("2e1", 20)]
    #[case("1.5e1일", 15)]
    #[case("3e", 3)]
    #[case("", 0)]
    #[case("셋째날", 0)]
    fn test_parse_day(#[case] input: &str, #[case] expected: i32) {
        let patterns = Patterns::compile().unwrap();
        assert_eq!(patterns.parse_day(input), expected);
    }

    #[test]
    fn test_collapse_whitespace() {
        let patterns = Patterns::compile().unwrap();
        assert_eq!(patterns.collapse_whitespace("  고려   풍속\n기록 "), "고려 풍속 기록");
    }
}
