//! Source positions and raw text of CST nodes.

use pest::iterators::Pair;

use crate::ast::Location;
use crate::cst::is_error;
use crate::parser::Rule;

/// Location of the token interval matched by `pair`. Zero-width matches
/// (missing tokens) yield `min == max`.
///
/// A rule whose trailing optional part did not match still owns the
/// whitespace and comments skipped before it; they are not part of the node.
pub fn location_of(pair: &Pair<'_, Rule>) -> Location {
    let start = pair.as_span().start();
    Location::from_range(start, content_end(pair))
}

/// Location covering `first` through `last`.
pub fn location_between(first: &Pair<'_, Rule>, last: &Pair<'_, Rule>) -> Location {
    location_of(first).join(location_of(last))
}

/// Raw source slice matched by `pair`, without trailing trivia.
pub fn text_of(pair: &Pair<'_, Rule>) -> String {
    let len = content_end(pair) - pair.as_span().start();
    pair.as_str().get(..len).unwrap_or_default().to_string()
}

/// End offset of the last real token under `pair`.
fn content_end(pair: &Pair<'_, Rule>) -> usize {
    let span = pair.as_span();
    // Leaf tokens never skip trivia.
    if pair.clone().into_inner().next().is_none() {
        return span.start() + pair.as_str().trim_end().len();
    }

    let tail_start = pair
        .clone()
        .into_inner()
        .filter(|child| !child.as_str().is_empty())
        .map(|child| content_end(&child))
        .max()
        .unwrap_or(span.start());
    let tail = pair.as_str().get(tail_start - span.start()..).unwrap_or_default();
    tail_start + literal_len(tail)
}

/// Length of `tail` up to the end of its last literal token, ignoring
/// whitespace and comments. Only punctuation such as `)` or `]` can follow
/// the last child of a rule.
fn literal_len(tail: &str) -> usize {
    let mut end = 0;
    let mut pos = 0;
    while pos < tail.len() {
        let rest = &tail[pos..];
        if let Some(c) = rest.chars().next().filter(|c| c.is_whitespace()) {
            pos += c.len_utf8();
        } else if rest.starts_with("//") {
            pos += rest.find('\n').unwrap_or(rest.len());
        } else if rest.starts_with("/*") {
            pos += rest.find("*/").map_or(rest.len(), |close| close + 2);
        } else {
            pos += rest.chars().next().map_or(1, char::len_utf8);
            end = pos;
        }
    }
    end
}

/// True when the token exists and its text is real input rather than a
/// recovery placeholder.
pub fn text_is_valid(token: Option<&Pair<'_, Rule>>) -> bool {
    match token {
        Some(pair) => !is_error(pair) && !pair.as_str().trim().is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::PairExt;
    use crate::parser::EsqlParser;
    use pest::Parser;

    fn statement(source: &str) -> Pair<'_, Rule> {
        EsqlParser::parse(Rule::single_statement, source)
            .unwrap()
            .next()
            .unwrap()
    }

    #[test]
    fn test_location_of_command() {
        let root = statement("FROM a | LIMIT 10");
        let limit = root.child(Rule::limit_command).unwrap();
        assert_eq!(location_of(&limit), Location { min: 9, max: 16 });
        assert_eq!(text_of(&limit), "LIMIT 10");
    }

    #[test]
    fn test_trailing_whitespace_is_not_part_of_command() {
        let root = statement("FROM logs   | LIMIT 1");
        let from = root.child(Rule::from_command).unwrap();
        assert_eq!(text_of(&from), "FROM logs");
        assert_eq!(location_of(&from), Location { min: 0, max: 8 });
    }

    #[test]
    fn test_trailing_comments_are_not_part_of_command() {
        let root = statement("FROM logs /* c */ | WHERE f(a) // note\n");
        let from = root.child(Rule::from_command).unwrap();
        assert_eq!(text_of(&from), "FROM logs");

        let where_command = root.child(Rule::where_command).unwrap();
        assert_eq!(text_of(&where_command), "WHERE f(a)");
        assert_eq!(location_of(&where_command), Location { min: 20, max: 29 });
    }

    #[test]
    fn test_closing_punctuation_is_kept() {
        let root = statement("ROW a = [1, 2] ");
        let row = root.child(Rule::row_command).unwrap();
        assert_eq!(text_of(&row), "ROW a = [1, 2]");
    }

    #[test]
    fn test_missing_token_is_degenerate_and_invalid() {
        let root = statement("SHOW");
        let show_info = root
            .child(Rule::show_command)
            .and_then(|show| show.child(Rule::show_info))
            .unwrap();
        let missing = show_info.child(Rule::missing_token).unwrap();
        let location = location_of(&missing);
        assert_eq!(location.min, location.max);
        assert!(!text_is_valid(Some(&missing)));
        assert!(!text_is_valid(None));
    }

    #[test]
    fn test_present_token_is_valid() {
        let root = statement("SHOW info");
        let info = root
            .child(Rule::show_command)
            .and_then(|show| show.child(Rule::show_info))
            .and_then(|show_info| show_info.child(Rule::KW_INFO))
            .unwrap();
        assert!(text_is_valid(Some(&info)));
        assert_eq!(location_of(&info), Location { min: 5, max: 8 });
    }
}
