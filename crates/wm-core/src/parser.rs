//! Parser for the line-oriented map notation → [`WardleyMap`].
//!
//! Built on `winnow` 0.7. Every line is trimmed and classified on its own;
//! keyword lines (`title`, `component`, `note`, `evolution`, `style`) are
//! recognised first and anything containing ` -> ` falls back to a
//! connection. Lines that fit no form are dropped without failing the
//! parse, so a half-typed document still renders. [`skipped_lines`] reports
//! what was dropped.
//!
//! ```text
//! title Tea Shop
//! evolution Genesis -> Custom -> Product -> Commodity
//! component Cup of Tea [0.79, 0.61] label [19, -4] (buy)
//! note Standardising [0.30, 0.70]
//! Cup of Tea -> Tea
//! ```
//!
//! Coordinates are written `[y, x]`: value chain first, evolution second.

use crate::model::*;
use winnow::ascii::space1;
use winnow::combinator::{opt, preceded, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

/// One classified line of notation.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Empty or `//` comment.
    Blank,
    Title(String),
    Component(Component),
    Note(Note),
    Evolution(Vec<String>),
    Style(String),
    Connection(Connection),
}

/// Why a non-blank line contributed nothing to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Unrecognized,
    MalformedComponent,
    MalformedNote,
    MalformedEvolution,
    MalformedStyle,
    MalformedConnection,
    DuplicateComponent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the source.
    pub line: usize,
    pub text: String,
    pub reason: SkipReason,
}

/// Parse notation into a map. Never fails; see [`skipped_lines`] for what
/// was ignored.
#[must_use = "parsing result should be used"]
pub fn parse_map(input: &str) -> WardleyMap {
    parse_map_with_skips(input).0
}

/// Lines of `input` that [`parse_map`] ignores, with the reason.
pub fn skipped_lines(input: &str) -> Vec<SkippedLine> {
    parse_map_with_skips(input).1
}

pub fn parse_map_with_skips(input: &str) -> (WardleyMap, Vec<SkippedLine>) {
    let mut map = WardleyMap::default();
    let mut skipped = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let outcome = match parse_line(raw) {
            Ok(Line::Blank) => Ok(()),
            Ok(Line::Title(title)) => {
                map.title = title;
                Ok(())
            }
            Ok(Line::Component(component)) => {
                if map.component(&component.name).is_some() {
                    Err(SkipReason::DuplicateComponent)
                } else {
                    map.components.push(component);
                    Ok(())
                }
            }
            Ok(Line::Note(note)) => {
                map.notes.push(note);
                Ok(())
            }
            Ok(Line::Evolution(stages)) => {
                map.evolution = stages;
                Ok(())
            }
            Ok(Line::Style(style)) => {
                map.style = style;
                Ok(())
            }
            Ok(Line::Connection(conn)) => {
                map.connections.push(conn);
                Ok(())
            }
            Err(reason) => Err(reason),
        };

        if let Err(reason) = outcome {
            log::trace!("skipping line {}: {reason:?}: {raw:?}", idx + 1);
            skipped.push(SkippedLine {
                line: idx + 1,
                text: raw.trim().to_string(),
                reason,
            });
        }
    }

    (map, skipped)
}

/// Classify a single line of notation.
pub fn parse_line(raw: &str) -> Result<Line, SkipReason> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with("//") {
        return Ok(Line::Blank);
    }

    if let Some(rest) = strip_keyword(line, "title") {
        return Ok(Line::Title(rest.trim().to_string()));
    }
    if let Some(mut rest) = strip_keyword(line, "component") {
        return parse_component_body
            .parse_next(&mut rest)
            .map(Line::Component)
            .map_err(|_| SkipReason::MalformedComponent);
    }
    // Keyword lines may contain ` -> ` themselves (`evolution`, note text),
    // so the connection fallback must come after every keyword.
    if let Some(mut rest) = strip_keyword(line, "note") {
        return parse_note_body
            .parse_next(&mut rest)
            .map(Line::Note)
            .map_err(|_| SkipReason::MalformedNote);
    }
    if let Some(rest) = strip_keyword(line, "evolution") {
        let stages: Vec<String> = rest
            .split("->")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if stages.is_empty() {
            return Err(SkipReason::MalformedEvolution);
        }
        return Ok(Line::Evolution(stages));
    }
    if let Some(rest) = strip_keyword(line, "style") {
        let style = rest.trim();
        if style.is_empty() {
            return Err(SkipReason::MalformedStyle);
        }
        return Ok(Line::Style(style.to_string()));
    }
    if line.contains(" -> ") {
        return parse_connection(line).ok_or(SkipReason::MalformedConnection);
    }

    Err(SkipReason::Unrecognized)
}

// ─── Line bodies ─────────────────────────────────────────────────────────

/// The remainder of `line` after `word` and at least one space.
fn strip_keyword<'a>(line: &'a str, word: &'static str) -> Option<&'a str> {
    let mut rest = line;
    let parsed: Result<&str, ErrMode<ContextError>> =
        terminated(word, space1).parse_next(&mut rest);
    parsed.ok().map(|_| rest)
}

/// `<name> [<y>, <x>] <modifiers>` after the `component` keyword.
fn parse_component_body(input: &mut &str) -> ModalResult<Component> {
    let name = parse_label_text(input)?;
    let (y, x) = parse_coordinates(input)?;

    let mut component = Component::new(name, x, y);
    let modifiers = *input;
    component.label = find_label(modifiers);
    component.category = find_category(modifiers);
    component.inertia = modifiers.contains("inertia");
    component.color = find_color(modifiers);
    Ok(component)
}

/// `<text> [<y>, <x>]` after the `note` keyword; trailing text is ignored.
fn parse_note_body(input: &mut &str) -> ModalResult<Note> {
    let text = parse_label_text(input)?;
    let (y, x) = parse_coordinates(input)?;
    Ok(Note {
        text: text.to_string(),
        x,
        y,
    })
}

/// `<from> -> <to>`, split at the first arrow.
fn parse_connection(line: &str) -> Option<Line> {
    let (from, to) = line.split_once("->")?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some(Line::Connection(Connection::new(from, to)))
}

// ─── Modifiers ───────────────────────────────────────────────────────────

fn find_label(modifiers: &str) -> Option<LabelOffset> {
    modifiers.match_indices("label").find_map(|(at, kw)| {
        let mut rest = &modifiers[at + kw.len()..];
        skip_space(&mut rest);
        parse_coordinates
            .parse_next(&mut rest)
            .ok()
            .map(|(dx, dy)| LabelOffset { dx, dy })
    })
}

/// `(build)` beats `(buy)` beats `(outsource)`, wherever they appear.
fn find_category(modifiers: &str) -> Option<Category> {
    [Category::Build, Category::Buy, Category::Outsource]
        .into_iter()
        .find(|cat| modifiers.contains(&format!("({})", cat.keyword())))
}

fn find_color(modifiers: &str) -> Option<String> {
    let start = modifiers.find("color(")? + "color(".len();
    let mut rest = &modifiers[start..];
    let value: Result<&str, ErrMode<ContextError>> =
        terminated(take_till(1.., ')'), ')').parse_next(&mut rest);
    let value = value.ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// ─── Primitives ──────────────────────────────────────────────────────────

fn skip_space(input: &mut &str) {
    use winnow::ascii::space0;
    let _: Result<&str, ErrMode<ContextError>> = space0.parse_next(input);
}

/// Free text up to the next `[`, trimmed; must not be empty.
fn parse_label_text<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let text = take_till(1.., '[').parse_next(input)?.trim();
    if text.is_empty() {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    Ok(text)
}

/// `[a, b]` with optional spaces around each number.
fn parse_coordinates(input: &mut &str) -> ModalResult<(f64, f64)> {
    let _ = '['.parse_next(input)?;
    skip_space(input);
    let first = parse_number(input)?;
    skip_space(input);
    let _ = ','.parse_next(input)?;
    skip_space(input);
    let second = parse_number(input)?;
    skip_space(input);
    let _ = ']'.parse_next(input)?;
    Ok((first, second))
}

/// Signed decimal: `-3`, `+0.5`, `.25`, `12.`.
fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    let _ = opt(one_of(['-', '+'])).parse_next(input)?;
    let int: &str = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let frac: Option<&str> =
        opt(preceded('.', take_while(0.., |c: char| c.is_ascii_digit()))).parse_next(input)?;
    if int.is_empty() && frac.is_none_or(str::is_empty) {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn component_brackets_are_y_then_x() {
        let map = parse_map("component Kettle [0.43, 0.35]");
        let kettle = map.component("Kettle").expect("component missing");
        assert_eq!(kettle.y, 0.43);
        assert_eq!(kettle.x, 0.35);
    }

    #[test]
    fn component_modifiers_in_any_order() {
        let map = parse_map(
            "component Power [0.1, 0.7] inertia color(#ff0000) (outsource) label [-27, 20]",
        );
        let power = &map.components[0];
        assert_eq!(power.category, Some(Category::Outsource));
        assert!(power.inertia);
        assert_eq!(power.color.as_deref(), Some("#ff0000"));
        assert_eq!(power.label, Some(LabelOffset { dx: -27.0, dy: 20.0 }));
    }

    #[test]
    fn build_outranks_buy_outranks_outsource() {
        let map = parse_map(
            "component Hot Water [0.45, 0.8] (buy) (build)\n\
             component Kettle [0.4, 0.3] (outsource) (buy)\n\
             component Cup [0.7, 0.6] (outsource) (build) (buy)",
        );
        let categories: Vec<_> = map.components.iter().map(|c| c.category).collect();
        assert_eq!(
            categories,
            vec![Some(Category::Build), Some(Category::Buy), Some(Category::Build)]
        );
    }

    #[test]
    fn unicode_component_names() {
        let map = parse_map("component Thé vert 🍵 [0.5, 0.5]");
        assert_eq!(map.components[0].name, "Thé vert 🍵");
    }

    #[test]
    fn duplicate_component_keeps_first() {
        let input = "component A [0.1, 0.1]\ncomponent A [0.9, 0.9]";
        let (map, skipped) = parse_map_with_skips(input);
        assert_eq!(map.components.len(), 1);
        assert_eq!(map.components[0].x, 0.1);
        assert_eq!(skipped[0].reason, SkipReason::DuplicateComponent);
        assert_eq!(skipped[0].line, 2);
    }

    #[test]
    fn connections_and_notes() {
        let input = "\
component A [0.5, 0.5]
component B [0.2, 0.2]
A -> B
note Watch this [0.35, 0.6]
";
        let map = parse_map(input);
        assert_eq!(map.components.len(), 2);
        assert_eq!(map.connections, vec![Connection::new("A", "B")]);
        assert_eq!(
            map.notes,
            vec![Note {
                text: "Watch this".into(),
                x: 0.6,
                y: 0.35
            }]
        );
    }

    #[test]
    fn connection_splits_at_first_arrow() {
        assert_eq!(
            parse_line("A-> B -> C"),
            Ok(Line::Connection(Connection::new("A", "B -> C")))
        );
    }

    #[test]
    fn arrow_without_spaces_is_not_a_connection() {
        assert_eq!(parse_line("A->B"), Err(SkipReason::Unrecognized));
    }

    #[test]
    fn evolution_is_a_keyword_not_a_connection() {
        let map = parse_map("evolution Concept -> Emerging -> Good -> Best");
        assert!(map.connections.is_empty());
        assert_eq!(map.evolution, vec!["Concept", "Emerging", "Good", "Best"]);
    }

    #[test]
    fn arrows_inside_keyword_lines_stay_keywords() {
        let input = "\
note Build -> Buy [0.3, 0.7]
style hand -> drawn
title Tea -> Cake
";
        let map = parse_map(input);
        assert!(map.connections.is_empty());
        assert_eq!(map.notes[0].text, "Build -> Buy");
        assert_eq!(map.style, "hand -> drawn");
        assert_eq!(map.title, "Tea -> Cake");
    }

    #[test]
    fn title_style_and_defaults() {
        let map = parse_map("");
        assert_eq!(map.style, "wardley");
        assert!(map.evolution.is_empty());

        let map = parse_map("title Tea Shop\nstyle handwritten\ntitle Tea Shop v2");
        assert_eq!(map.title, "Tea Shop v2");
        assert_eq!(map.style, "handwritten");
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let input = "// header\n\n   \n   // indented comment\ncomponent A [1, 0]";
        let (map, skipped) = parse_map_with_skips(input);
        assert_eq!(map.components.len(), 1);
        assert!(skipped.is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let input = "\
component Broken [0.5]
component [0.1, 0.2]
component Bad [abc, 0.2]
note missing coords
gibberish here
component Good [0.3, 0.4]
";
        let (map, skipped) = parse_map_with_skips(input);
        assert_eq!(map.components.len(), 1);
        assert_eq!(map.components[0].name, "Good");
        let reasons: Vec<_> = skipped.iter().map(|s| (s.line, s.reason)).collect();
        assert_eq!(
            reasons,
            vec![
                (1, SkipReason::MalformedComponent),
                (2, SkipReason::MalformedComponent),
                (3, SkipReason::MalformedComponent),
                (4, SkipReason::MalformedNote),
                (5, SkipReason::Unrecognized),
            ]
        );
    }

    #[test]
    fn numbers_accept_signs_and_bare_fractions() {
        let map = parse_map("component A [ -.5 ,+1.]");
        assert_eq!(map.components[0].y, -0.5);
        assert_eq!(map.components[0].x, 1.0);
    }

    #[test]
    fn unresolved_connection_is_kept() {
        let map = parse_map("A -> Ghost");
        assert_eq!(map.connections.len(), 1);
        assert!(map.resolve_connection(&map.connections[0]).is_none());
    }
}
