//! In-place edits of map notation.
//!
//! The notation is never re-emitted from the model; programmatic edits
//! rewrite the smallest substring that carries the changed value and leave
//! every other byte of the user's text alone.

/// Rewrite the coordinates of the first `component <name> [ ... ]`
/// occurrence to `y, x` with two decimals. Returns the text unchanged when
/// no declaration of `name` is found.
///
/// The match is purely textual: the keyword, at least one whitespace
/// character, the exact name, optional whitespace, then `[` followed by a
/// non-empty run up to `]`.
pub fn patch_component_position(text: &str, name: &str, x: f64, y: f64) -> String {
    match find_coordinate_span(text, name) {
        Some((start, end)) => {
            let mut out = String::with_capacity(text.len() + 8);
            out.push_str(&text[..start]);
            out.push_str(&format!("{y:.2}, {x:.2}"));
            out.push_str(&text[end..]);
            out
        }
        None => {
            log::debug!("no declaration of component {name:?} to patch");
            text.to_string()
        }
    }
}

/// Byte range of the coordinate run inside the brackets.
fn find_coordinate_span(text: &str, name: &str) -> Option<(usize, usize)> {
    const KEYWORD: &str = "component";
    if name.is_empty() {
        return None;
    }
    for (at, _) in text.match_indices(KEYWORD) {
        let after_kw = &text[at + KEYWORD.len()..];
        let ws = leading_whitespace(after_kw);
        if ws == 0 {
            continue;
        }
        let Some(after_name) = after_kw[ws..].strip_prefix(name) else {
            continue;
        };
        let ws2 = leading_whitespace(after_name);
        let Some(inside) = after_name[ws2..].strip_prefix('[') else {
            continue;
        };
        let Some(len) = inside.find(']') else {
            continue;
        };
        if len == 0 {
            continue;
        }
        let start = text.len() - inside.len();
        return Some((start, start + len));
    }
    None
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}
