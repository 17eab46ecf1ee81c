//! HTML → canonical natural-language text
//!
//! 1. Drop non-content regions (navigation, chrome, scripts, ad/menu blocks)
//! 2. Pick primary-content containers, falling back to `<body>`
//! 3. Collect text from narrative elements inside those containers
//! 4. Collapse whitespace

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

static NON_CONTENT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#"nav, footer, header, aside, .ads, .advertisement, script, style, [class*="banner"], [class*="menu"], [id*="menu"], [class*="nav"], [id*="nav"]"#,
    )
    .expect("non-content selector is valid")
});

static MAIN_CONTENT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#"main, article, [role="main"], .main-content, #main-content, .content, #content"#,
    )
    .expect("main-content selector is valid")
});

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("body selector is valid"));

static TEXT_ELEMENTS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p, h1, h2, h3, h4, h5, h6, li, blockquote, pre, table, dl")
        .expect("text-element selector is valid")
});

/// Extract cleaned text from an HTML document
///
/// Returns `None` when no qualifying element carries any text.
pub fn extract_text(html: &str) -> Option<String> {
    let mut document = Html::parse_document(html);
    strip_non_content(&mut document);

    // Html::select walks every node in the arena, including detached ones,
    // so all lookups go through the root element.
    let root = document.root_element();

    let mut containers: HashSet<_> = root.select(&MAIN_CONTENT).map(|el| el.id()).collect();
    if containers.is_empty() {
        containers = root.select(&BODY).map(|el| el.id()).collect();
    }

    let pieces: Vec<String> = root
        .select(&TEXT_ELEMENTS)
        .filter(|el| el.ancestors().any(|a| containers.contains(&a.id())))
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    let text = normalize_whitespace(&pieces.join(" "));
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Collapse every whitespace run to a single space and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_non_content(document: &mut Html) {
    let doomed: Vec<_> = document
        .root_element()
        .select(&NON_CONTENT)
        .map(|el| el.id())
        .collect();

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_main_content_container() {
        let html = r#"
            <html><body>
              <p>Outside paragraph</p>
              <main>
                <h1>Title</h1>
                <p>First   paragraph
                   spans lines.</p>
                <div>Loose div text is ignored</div>
              </main>
            </body></html>
        "#;

        let text = extract_text(html).unwrap();
        assert_eq!(text, "Title First paragraph spans lines.");
    }

    #[test]
    fn test_falls_back_to_body() {
        let html = "<html><body><h2>Heading</h2><ul><li>one</li><li>two</li></ul></body></html>";
        let text = extract_text(html).unwrap();
        assert_eq!(text, "Heading one two");
    }

    #[test]
    fn test_strips_navigation_and_scripts() {
        let html = r#"
            <html><body>
              <header><p>Site header</p></header>
              <nav><li>Home</li></nav>
              <div class="top-menu"><p>Menu entry</p></div>
              <div id="navbar"><p>Nav entry</p></div>
              <div class="banner-ad"><p>Buy now</p></div>
              <article>
                <p>Real content.</p>
                <script>var x = "<p>not text</p>";</script>
                <aside><p>Related links</p></aside>
              </article>
              <footer><p>Copyright</p></footer>
            </body></html>
        "#;

        let text = extract_text(html).unwrap();
        assert_eq!(text, "Real content.");
    }

    #[test]
    fn test_nested_containers_do_not_duplicate_text() {
        let html = r#"
            <html><body>
              <main><article><p>Only once</p></article></main>
            </body></html>
        "#;
        assert_eq!(extract_text(html).unwrap(), "Only once");
    }

    #[test]
    fn test_no_qualifying_elements() {
        let html = "<html><body><div>just a div</div><span>and a span</span></body></html>";
        assert_eq!(extract_text(html), None);
    }

    #[test]
    fn test_empty_elements_skipped() {
        let html = "<html><body><p>   </p><p>kept</p><li></li></body></html>";
        assert_eq!(extract_text(html).unwrap(), "kept");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b   c  "), "a b c");
        assert_eq!(normalize_whitespace(" \n "), "");
    }
}
