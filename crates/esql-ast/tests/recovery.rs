//! Malformed and partial statements still produce a well-formed AST.

mod common;

use common::{command, commands, parse_ok};
use esql_ast::*;

#[test]
fn test_unknown_stage_does_not_cascade() {
    let result = parse_ok("FROM a | FOO bar | WHERE b > 1 | LIMIT 1");
    let names: Vec<_> = result.ast.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["from", "where", "limit"]);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].text, "FOO bar");
}

#[test]
fn test_trailing_junk_marks_command_incomplete() {
    let result = parse_ok("FROM a | LIMIT abc | KEEP b");
    assert_eq!(result.ast.len(), 3);
    let limit = &result.ast[1];
    assert!(limit.incomplete);
    assert!(limit.args.is_empty());
    assert_eq!(limit.text, "LIMIT abc");
    assert!(!result.ast[2].incomplete);
}

#[test]
fn test_partial_clauses() {
    let join = command("FROM a | LOOKUP JOIN idx ON", 1);
    let on = join.args.last().unwrap();
    assert_eq!(on.name(), "on");
    assert!(on.children().is_empty());

    let rename = command("FROM a | RENAME x AS", 1);
    assert_eq!(rename.args.len(), 1);
    assert!(rename.args[0].incomplete());

    let eval = command("FROM a | EVAL y =", 1);
    assert!(eval.args[0].incomplete());
}

#[test]
fn test_unterminated_pattern() {
    let grok = command("FROM a | GROK msg \"%{WORD:w}", 1);
    assert_eq!(grok.args.len(), 2);
    assert!(grok.args[1].incomplete());
}

#[test]
fn test_unterminated_pattern_text_matches_span() {
    let source = "FROM a | GROK m \"%{a}   | LIMIT 1";
    let result = parse_ok(source);
    assert_eq!(result.ast.len(), 3);
    match &result.ast[1].args[1] {
        Expression::Literal(pattern) => {
            assert_eq!(&source[pattern.location.min..=pattern.location.max], pattern.text);
            assert_eq!(pattern.text, "\"%{a}");
            assert_eq!(pattern.value, Value::String("%{a}".into()));
            assert!(pattern.incomplete);
        }
        other => panic!("expected literal, got {other:?}"),
    }
}

#[test]
fn test_missing_required_operand() {
    for source in [
        "FROM",
        "FROM a | SORT",
        "FROM a | WHERE",
        "FROM a | DISSECT",
        "FROM a | GROK",
        "FROM a | KEEP",
        "FROM a | CHANGE_POINT ON AS",
        "FROM a | LOOKUP JOIN ON",
        "FROM a | ENRICH",
    ] {
        let result = parse_ok(source);
        let last = result.ast.last().unwrap();
        assert!(last.incomplete, "{source}");
        assert!(!result.errors.is_empty(), "{source}");
        assert!(
            result.errors.iter().all(|e| e.message.starts_with("Missing token")),
            "{source}: {:?}",
            result.errors
        );
        assert!(
            last.args.iter().all(|arg| !matches!(arg, Expression::Unknown(_))),
            "{source}"
        );
    }

    let change_point = command("FROM a | CHANGE_POINT ON AS", 1);
    assert!(change_point.args.is_empty());

    let join = command("FROM a | LOOKUP JOIN ON", 1);
    assert_eq!(join.args.len(), 2);
    assert_eq!(join.args[1].name(), "on");
    assert!(join.args[1].children().is_empty());
}

#[test]
fn test_show_missing_info() {
    let result = parse_ok("SHOW");
    assert_eq!(result.ast.len(), 1);
    assert!(result.ast[0].args.is_empty());
    assert!(result.ast[0].incomplete);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.starts_with("Missing token"));
}

#[test]
fn test_empty_and_separator_only_input() {
    assert!(commands("").is_empty());
    assert!(commands("| |").is_empty());
}

#[test]
fn test_no_placeholder_args() {
    for source in [
        "FROM",
        "FROM a | WHERE",
        "FROM a | SORT",
        "FROM a | ENRICH",
        "FROM a | STATS BY",
        "FROM a | EVAL x =",
        "FROM a | RENAME x",
    ] {
        for command in commands(source) {
            assert!(
                command.args.iter().all(|arg| !matches!(arg, Expression::Unknown(_))),
                "{source}"
            );
        }
    }
}
