//! Small query surface over the scraper tree
//!
//! Extraction code only talks to elements through [`NodeExt`], so the
//! heuristics stay independent of the tree library's traversal details.

use scraper::{ElementRef, Html, Node, Selector};

pub trait NodeExt<'a> {
    /// Descendant matches of the first selector that yields any hit
    fn find_all(&self, selectors: &[Selector]) -> Vec<ElementRef<'a>>;

    fn find_first(&self, selectors: &[Selector]) -> Option<ElementRef<'a>>;

    /// Every text node below this element, concatenated
    fn text_content(&self) -> String;

    fn trimmed_text(&self) -> String;

    /// Text content skipping every subtree whose root matches `skip`
    fn text_without<F>(&self, skip: F) -> String
    where
        F: Fn(&ElementRef<'a>) -> bool;

    fn attr_or_empty(&self, name: &str) -> &'a str;

    fn next_element(&self) -> Option<ElementRef<'a>>;

    fn parent_element(&self) -> Option<ElementRef<'a>>;

    /// This element followed by its descendants, in document order
    fn self_and_descendants(&self) -> Vec<ElementRef<'a>>;

    fn matches_any(&self, selectors: &[Selector]) -> bool;
}

impl<'a> NodeExt<'a> for ElementRef<'a> {
    fn find_all(&self, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
        selectors
            .iter()
            .map(|selector| self.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }

    fn find_first(&self, selectors: &[Selector]) -> Option<ElementRef<'a>> {
        selectors
            .iter()
            .find_map(|selector| self.select(selector).next())
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn trimmed_text(&self) -> String {
        self.text_content().trim().to_string()
    }

    fn text_without<F>(&self, skip: F) -> String
    where
        F: Fn(&ElementRef<'a>) -> bool,
    {
        let root_id = self.id();
        let mut out = String::new();

        for node in self.descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };

            let excluded = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != root_id)
                .filter_map(ElementRef::wrap)
                .any(|element| skip(&element));

            if !excluded {
                out.push_str(text);
            }
        }

        out
    }

    fn attr_or_empty(&self, name: &str) -> &'a str {
        self.value().attr(name).unwrap_or_default()
    }

    fn next_element(&self) -> Option<ElementRef<'a>> {
        self.next_siblings().find_map(ElementRef::wrap)
    }

    fn parent_element(&self) -> Option<ElementRef<'a>> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn self_and_descendants(&self) -> Vec<ElementRef<'a>> {
        self.descendants().filter_map(ElementRef::wrap).collect()
    }

    fn matches_any(&self, selectors: &[Selector]) -> bool {
        selectors.iter().any(|selector| selector.matches(self))
    }
}

/// Elements of `document` from `start` onwards, in document order
pub fn elements_from<'a>(document: &'a Html, start: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .skip_while(|node| node.id() != start.id())
        .filter_map(ElementRef::wrap)
        .collect()
}

/// Text of an HTML fragment with every `<a>` subtree removed
pub fn fragment_text_without_anchors(fragment_html: &str) -> String {
    let fragment = Html::parse_fragment(fragment_html);
    fragment
        .root_element()
        .text_without(|element| element.value().name() == "a")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(css: &str) -> Selector {
        Selector::parse(css).unwrap()
    }

    #[test]
    fn test_find_all_uses_first_matching_selector() {
        let html = Html::parse_fragment(r#"<div><span class="b">1</span><span class="b">2</span></div>"#);
        let found = html
            .root_element()
            .find_all(&[selector(".missing"), selector(".b")]);

        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_text_without_skips_subtrees() {
        let html = Html::parse_fragment(r#"<p>앞 <a href="x">링크 <b>굵게</b></a> 뒤</p>"#);
        let text = html
            .root_element()
            .text_without(|element| element.value().name() == "a");

        assert_eq!(text, "앞  뒤");
    }

    #[test]
    fn test_next_element_skips_text_nodes() {
        let html = Html::parse_fragment("<div><table id=\"t\"></table>\n  <div id=\"n\">x</div></div>");
        let table = html.select(&selector("#t")).next().unwrap();

        let next = table.next_element().unwrap();
        assert_eq!(next.value().id(), Some("n"));
        assert_eq!(table.parent_element().unwrap().value().name(), "div");
    }

    #[test]
    fn test_elements_from_starts_at_element() {
        let html = Html::parse_document(r#"<p id="a">1</p><p id="b">2</p><p id="c">3</p>"#);
        let start = html.select(&selector("#b")).next().unwrap();

        let ids: Vec<_> = elements_from(&html, start)
            .iter()
            .filter_map(|element| element.value().id())
            .collect();

        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_fragment_text_without_anchors() {
        assert_eq!(
            fragment_text_without_anchors(r#"서긍(徐兢) <a href="x">원본</a>1123년"#),
            "서긍(徐兢) 1123년"
        );
    }
}
