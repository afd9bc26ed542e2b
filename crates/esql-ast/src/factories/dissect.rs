//! DISSECT: subject, pattern, then `name = value` options.

use pest::iterators::Pair;

use super::expressions::visit_expression;
use super::{create_command, create_literal, create_option};
use crate::ast::*;
use crate::cst::{is_error, PairExt};
use crate::parser::Rule;

pub fn create_dissect_command(ctx: &Pair<'_, Rule>) -> Command {
    let mut command = create_command("dissect", ctx);
    command.args = visit_subject_and_pattern(ctx);
    if let Some(options) = ctx.child(Rule::command_options) {
        command.args.extend(
            options
                .children_of(Rule::command_option)
                .iter()
                .map(visit_command_option),
        );
    }
    command
}

/// Subject expression and pattern literal shared with GROK.
pub(crate) fn visit_subject_and_pattern(ctx: &Pair<'_, Rule>) -> Vec<Expression> {
    let mut args = Vec::new();
    let subject = ctx.children().find(|child| {
        !is_error(child)
            && !matches!(
                child.as_rule(),
                Rule::KW_DISSECT | Rule::KW_GROK | Rule::pattern_string | Rule::command_options
            )
    });
    args.extend(subject.map(|subject| visit_expression(&subject)));

    let pattern = ctx
        .child(Rule::pattern_string)
        .and_then(|pattern| pattern.children().next());
    args.extend(pattern.map(|pattern| create_literal(&pattern)));
    args
}

/// `append_separator = "-"` becomes `Option("append_separator", ["-"])`.
fn visit_command_option(ctx: &Pair<'_, Rule>) -> Expression {
    let mut children = ctx.children();
    let name = children
        .next()
        .map(|name| name.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    let values = children.map(|value| visit_expression(&value)).collect();
    create_option(&name, ctx, values)
}
