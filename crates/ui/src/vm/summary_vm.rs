use std::collections::HashSet;

/// Strip the model's summary HTML down to the formatting tags the summary
/// panel renders. Scripts, styles, links and attributes are removed.
#[must_use]
pub fn sanitize_summary(html: &str) -> String {
    let tags: HashSet<&str> = [
        "h1", "h2", "h3", "h4", "p", "br", "em", "strong", "b", "i", "u", "ul", "ol", "li",
        "blockquote", "table", "thead", "tbody", "tr", "th", "td", "sub", "sup",
    ]
    .into_iter()
    .collect();

    ammonia::Builder::new()
        .tags(tags)
        .generic_attributes(HashSet::new())
        .link_rel(None)
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_structure_and_drops_scripts() {
        let html = "<h3 class=\"x\">Heart failure</h3><script>alert(1)</script><p onclick=\"x()\">EF &lt; 40%</p>";
        let clean = sanitize_summary(html);
        assert_eq!(clean, "<h3>Heart failure</h3><p>EF &lt; 40%</p>");
    }

    #[test]
    fn links_are_unwrapped() {
        assert_eq!(
            sanitize_summary("<p><a href=\"https://evil\">click</a></p>"),
            "<p>click</p>"
        );
    }
}
