//! Locating and filling `id="..."` placeholder elements in an HTML page.
//!
//! This is string matching, not an HTML parser. The placeholder's content runs
//! from the end of its opening tag to the closing tag that balances it, counting
//! nested elements of the same name. Comments and attribute values are not
//! treated specially.

fn is_attr_boundary(c: char) -> bool {
    c.is_ascii_whitespace()
}

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// First index at or after `from` where `prefix` (`<div` or `</div`) starts a
/// tag of exactly that name, so `<div` does not match `<divider`.
fn find_tag(page: &str, from: usize, prefix: &str) -> Option<usize> {
    page[from..]
        .match_indices(prefix)
        .map(|(i, _)| from + i)
        .find(|&i| {
            !page[i + prefix.len()..]
                .chars()
                .next()
                .is_some_and(is_tag_name_char)
        })
}

/// Returns the byte range of the placeholder's inner content.
fn find_placeholder(page: &str, slot: &str) -> Option<(usize, usize)> {
    let needles = [format!("id=\"{slot}\""), format!("id='{slot}'")];

    let attr = needles
        .iter()
        .flat_map(|needle| page.match_indices(needle.as_str()).map(|(i, _)| i))
        .filter(|&i| page[..i].chars().next_back().is_some_and(is_attr_boundary))
        .min()?;

    let tag_start = page[..attr].rfind('<')?;
    let name: String = page[tag_start + 1..]
        .chars()
        .take_while(|c| is_tag_name_char(*c))
        .collect();
    if name.is_empty() {
        return None;
    }

    let open_end = attr + page[attr..].find('>')?;
    if page[..open_end].ends_with('/') {
        // <div id="x"/> has no content to replace
        return None;
    }
    let content_start = open_end + 1;

    let open = format!("<{name}");
    let close = format!("</{name}");
    let mut depth = 1;
    let mut pos = content_start;
    loop {
        let next_close = find_tag(page, pos, &close)?;
        match find_tag(page, pos, &open) {
            Some(next_open) if next_open < next_close => {
                depth += 1;
                pos = next_open + open.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some((content_start, next_close));
                }
                pos = next_close + close.len();
            }
        }
    }
}

/// True if `page` has an element with `id` equal to `slot` that can take content.
pub fn has_placeholder(page: &str, slot: &str) -> bool {
    find_placeholder(page, slot).is_some()
}

/// Replaces the inner content of the `slot` placeholder with `html`.
/// Returns `None` when the page has no such placeholder.
pub fn fill_placeholder(page: &str, slot: &str, html: &str) -> Option<String> {
    let (start, end) = find_placeholder(page, slot)?;

    let mut out = String::with_capacity(page.len() - (end - start) + html.len());
    out.push_str(&page[..start]);
    out.push_str(html);
    out.push_str(&page[end..]);
    Some(out)
}
