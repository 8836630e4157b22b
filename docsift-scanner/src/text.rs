use scraper::{Html, Node};

/// Elements whose whole subtree is dropped before text extraction.
pub const REMOVED_TAGS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Extract the visible text of a page as a single line.
///
/// Subtrees rooted at any of [`REMOVED_TAGS`] are skipped, the remaining text
/// nodes are concatenated in document order and every whitespace run is
/// collapsed into one space. Malformed markup never fails; html5ever repairs
/// what it can and the worst case is an empty string.
pub fn normalize_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    // Iterative walk, nesting depth is unbounded.
    let mut stack = vec![*document.root_element()];
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(element) if REMOVED_TAGS.contains(&element.name()) => {}
            Node::Element(_) => stack.extend(node.children().rev()),
            _ => {}
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
