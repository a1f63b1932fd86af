use scraper::{Html, Node};

/// Elements whose text never belongs to the recipe body
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "nav", "footer", "header", "svg", "iframe", "template",
];

/// Reduce an HTML document to plain text.
///
/// Drops script, style and navigation/footer markup, collapses every run of
/// whitespace into a single space and trims the result.
pub fn extract_text_from_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if !skipped {
            parts.push(text);
        }
    }

    collapse_whitespace(&parts.join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_html() {
        let html = r#"
            <html>
            <head><title>Test Recipe</title><style>body { color: red; }</style></head>
            <body>
                <header>Site name</header>
                <nav><a href="/">Home</a></nav>
                <h1>Test Recipe</h1>
                <p>Some   ingredients</p>
                <script>var tracking = true;</script>
                <p>Some
                   instructions</p>
                <footer>Copyright</footer>
            </body>
            </html>
        "#;

        let text = extract_text_from_html(html);
        assert!(text.contains("Some ingredients"));
        assert!(text.contains("Some instructions"));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("Copyright"));
        assert!(!text.contains("Site name"));
        assert!(!text.contains("  "));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_nested_skipped_elements() {
        let html = "<body><footer><div><p>deep footer</p></div></footer><main>Stew</main></body>";
        assert_eq!(extract_text_from_html(html), "Stew");
    }

    #[test]
    fn test_entities_are_decoded() {
        let html = "<body><p>Salt &amp; pepper</p></body>";
        assert_eq!(extract_text_from_html(html), "Salt & pepper");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_text_from_html(""), "");
    }
}
