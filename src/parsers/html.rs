use scraper::{Html, Selector};

/// Extracts the raw href strings from every anchor element in a document.
///
/// Values are returned as found, relative or absolute; resolving them
/// against a base URL is the caller's responsibility.
pub fn extract_links(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);

    let link_selector = Selector::parse("a").expect("static selector is valid");
    let links = doc
        .select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    ::log::debug!("HTML parser found {} links", links.len());

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_links() {
        let html = r#"<html><body>
            <a href="/a">a</a>
            <p>no link here</p>
            <a href="http://other.com/x">x</a>
            <a>anchor without href</a>
            <a href="../up">up</a>
        </body></html>"#;

        let links = extract_links(html);
        assert_eq!(links, vec!["/a", "http://other.com/x", "../up"]);
    }

    #[test]
    fn test_no_links() {
        assert!(extract_links("<html><body><p>plain</p></body></html>").is_empty());
        assert!(extract_links("").is_empty());
    }
}
