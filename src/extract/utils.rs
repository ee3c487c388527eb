use scraper::{ElementRef, Html, Selector};

/// Trimmed text content of an element.
pub(super) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first match in the whole document.
pub(super) fn select_text(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel).next().map(|el| element_text(&el))
}

/// Trimmed text of the first descendant of `root` matching `sel`.
pub(super) fn select_text_within(root: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    root.select(sel).next().map(|el| element_text(&el))
}

pub(super) fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// First following sibling element with the given tag and class.
pub(super) fn next_sibling_with<'a>(
    el: &ElementRef<'a>,
    tag: &str,
    class: &str,
) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sib| sib.value().name() == tag && has_class(sib, class))
}

/// First element after `anchor` in document order with the given tag carrying all `classes`.
pub(super) fn next_in_document<'a>(
    doc: &'a Html,
    anchor: &ElementRef<'a>,
    tag: &str,
    classes: &[&str],
) -> Option<ElementRef<'a>> {
    doc.root_element()
        .descendants()
        .skip_while(|node| node.id() != anchor.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag && classes.iter().all(|c| has_class(el, c)))
}

/// Collapse whitespace and undo the non-breaking-space artifacts found in page headings.
///
/// `U+00A0` arrives either intact or as the mojibake pair `Â` + `U+00A0`
/// (UTF-8 bytes read as Latin-1); both become a plain space.
pub(super) fn normalize_heading(text: &str) -> String {
    text.replace("\u{c2}\u{a0}", " ")
        .replace('\u{a0}', " ")
        .replace("\u{c2} ", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prefix of at most `max_chars` characters, for logging bodies.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
