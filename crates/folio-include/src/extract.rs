//! Fragment body extraction.
//!
//! A landmark scan over the flat OpenDocument text, not an XML parse:
//! malformed markup elsewhere in the file does not prevent extraction.

/// Start of the root text container element.
const ROOT_OPEN: &str = "<office:text";

/// End of the root text container element.
const ROOT_CLOSE: &str = "</office:text>";

/// End of the sequence declarations section preceding the body.
const SEQUENCE_DECLS_CLOSE: &str = "</text:sequence-decls>";

/// Extract the reusable body markup from fragment file text.
///
/// Returns the trimmed content of the root text container, without a leading
/// sequence declarations section. Returns `None` if the opening and closing
/// root tags are not both present in that order.
///
/// # Example
///
/// ```
/// use folio_include::extract_body;
///
/// let fodt = "<office:text><text:sequence-decls/></text:sequence-decls> <text:p>Hi</text:p> </office:text>";
/// assert_eq!(extract_body(fodt), Some("<text:p>Hi</text:p>"));
/// assert_eq!(extract_body("<office:document/>"), None);
/// ```
#[must_use]
pub fn extract_body(raw: &str) -> Option<&str> {
    let inner_start = find_open_tag_end(raw)?;
    let inner_len = raw[inner_start..].find(ROOT_CLOSE)?;
    let inner = &raw[inner_start..inner_start + inner_len];

    let body = match inner.find(SEQUENCE_DECLS_CLOSE) {
        Some(pos) => &inner[pos + SEQUENCE_DECLS_CLOSE.len()..],
        None => inner,
    };
    Some(body.trim())
}

/// Byte offset just past the first non-self-closing `<office:text ...>` tag.
fn find_open_tag_end(raw: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(pos) = raw[offset..].find(ROOT_OPEN) {
        let tag_start = offset + pos;
        let after_name = tag_start + ROOT_OPEN.len();
        let rest = &raw[after_name..];

        // `<office:text-foo` or `<office:textual` are different elements
        let is_exact = rest.starts_with(['>', '/']) || rest.starts_with(char::is_whitespace);
        let tag_end = after_name + rest.find('>')?;

        if is_exact && !raw[..tag_end].ends_with('/') {
            return Some(tag_end + 1);
        }
        offset = tag_end + 1;
    }
    None
}
