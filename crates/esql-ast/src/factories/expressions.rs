//! General expression visitor
//!
//! Turns any expression node of the grammar (boolean chains down to
//! constants) into an [`Expression`]. Binary chains fold left, so
//! `a - b - c` becomes `-(-(a, b), c)`.

use pest::iterators::Pair;

use super::{
    create_column, create_function, create_list, create_literal, create_operator,
    create_time_interval, create_unknown, create_wildcard_column, slice_within,
};
use crate::ast::*;
use crate::cst::PairExt;
use crate::parser::Rule;
use crate::position::{location_between, location_of, text_of};

pub fn visit_expression(ctx: &Pair<'_, Rule>) -> Expression {
    match ctx.as_rule() {
        Rule::boolean_expression
        | Rule::and_expression
        | Rule::value_expression
        | Rule::operator_expression
        | Rule::multiplicative_expression => visit_binary_chain(ctx),
        Rule::logical_not => visit_logical_not(ctx),
        Rule::predicate_expression => visit_predicate(ctx),
        Rule::negation => visit_negation(ctx),
        Rule::cast_expression => visit_inline_cast(ctx),
        Rule::parenthesized_expression => match ctx.children().next() {
            Some(inner) => visit_expression(&inner),
            None => create_unknown(ctx),
        },
        Rule::function_call => visit_function_call(ctx),
        Rule::qualified_name
        | Rule::qualified_name_pattern
        | Rule::unquoted_identifier
        | Rule::quoted_identifier
        | Rule::unquoted_id_pattern => create_column(ctx),
        Rule::list_literal => {
            let values = ctx.children().map(|value| visit_expression(&value)).collect();
            create_list(ctx, values)
        }
        Rule::time_interval => create_time_interval(ctx),
        // Literal tokens; anything else comes back as `Unknown`.
        _ => create_literal(ctx),
    }
}

/// `operand (operator operand)*`
fn visit_binary_chain(ctx: &Pair<'_, Rule>) -> Expression {
    let mut children = ctx.children();
    let Some(first) = children.next() else {
        return create_unknown(ctx);
    };

    let mut left = visit_expression(&first);
    while let Some(operator) = children.next() {
        let name = operator.as_str().to_ascii_lowercase();
        let args = match children.next() {
            Some(operand) => vec![left, visit_expression(&operand)],
            None => vec![left],
        };
        left = create_operator(&name, FunctionSubtype::BinaryExpression, ctx, args);
    }
    left
}

fn visit_logical_not(ctx: &Pair<'_, Rule>) -> Expression {
    let args = ctx
        .children()
        .filter(|child| child.as_rule() != Rule::KW_NOT)
        .map(|operand| visit_expression(&operand))
        .collect();
    create_function("not", FunctionSubtype::UnaryExpression, ctx, args)
}

fn visit_predicate(ctx: &Pair<'_, Rule>) -> Expression {
    let mut children = ctx.children();
    let Some(first) = children.next() else {
        return create_unknown(ctx);
    };
    let subject = visit_expression(&first);
    let Some(suffix) = children.next() else {
        return subject;
    };

    let negated = suffix.has_child(Rule::KW_NOT);
    match suffix.as_rule() {
        Rule::in_predicate => {
            let values = suffix
                .children_of(Rule::value_expression)
                .iter()
                .map(visit_expression)
                .collect();
            let list = create_list(&suffix, values);
            let name = if negated { "not in" } else { "in" };
            create_function(name, FunctionSubtype::BinaryExpression, ctx, vec![subject, list])
        }
        Rule::like_predicate => {
            let operator = suffix
                .child(Rule::like_operator)
                .map(|op| op.as_str().to_ascii_lowercase())
                .unwrap_or_else(|| "like".to_string());
            let name = if negated { format!("not {operator}") } else { operator };
            let mut args = vec![subject];
            args.extend(suffix.child(Rule::string).map(|pattern| create_literal(&pattern)));
            create_function(&name, FunctionSubtype::BinaryExpression, ctx, args)
        }
        Rule::null_predicate => {
            let name = if negated { "is not null" } else { "is null" };
            create_function(name, FunctionSubtype::PostfixUnaryExpression, ctx, vec![subject])
        }
        Rule::match_predicate => {
            let mut args = vec![subject];
            args.extend(suffix.children().next().map(|value| visit_expression(&value)));
            create_function(":", FunctionSubtype::BinaryExpression, ctx, args)
        }
        _ => subject,
    }
}

/// Unary minus. Applied directly to a numeric literal it is folded into the
/// literal.
fn visit_negation(ctx: &Pair<'_, Rule>) -> Expression {
    let Some(operand) = ctx.children().next() else {
        return create_unknown(ctx);
    };

    let operand = visit_expression(&operand);
    if let Expression::Literal(literal) = &operand {
        if let Some(value) = negate(&literal.value) {
            return Expression::Literal(Literal {
                literal_type: literal.literal_type,
                value,
                name: text_of(ctx),
                text: text_of(ctx),
                location: location_of(ctx),
                incomplete: literal.incomplete,
            });
        }
    }
    create_function("-", FunctionSubtype::UnaryExpression, ctx, vec![operand])
}

fn negate(value: &Value) -> Option<Value> {
    match value {
        Value::Int(n) => n.checked_neg().map(Value::Int),
        Value::Float(f) => Some(Value::Float(-f)),
        _ => None,
    }
}

/// `value::type::type` folds into nested casts, innermost first.
fn visit_inline_cast(ctx: &Pair<'_, Rule>) -> Expression {
    let mut children = ctx.children();
    let Some(first) = children.next() else {
        return create_unknown(ctx);
    };

    let mut value = visit_expression(&first);
    for data_type in children.filter(|child| child.as_rule() == Rule::data_type) {
        let cast_type = data_type.as_str().to_ascii_lowercase();
        let location = location_between(&first, &data_type);
        value = Expression::InlineCast(InlineCast {
            incomplete: value.incomplete(),
            value: Box::new(value),
            name: cast_type.clone(),
            cast_type,
            text: slice_within(ctx, location),
            location,
        });
    }
    value
}

fn visit_function_call(ctx: &Pair<'_, Rule>) -> Expression {
    let name = ctx
        .child(Rule::function_name)
        .map(|name| name.as_str().to_ascii_lowercase())
        .unwrap_or_default();

    let args = match ctx.child(Rule::function_args) {
        Some(function_args) => function_args
            .children()
            .map(|arg| match arg.as_rule() {
                Rule::wildcard => create_wildcard_column(&arg),
                _ => visit_expression(&arg),
            })
            .collect(),
        None => Vec::new(),
    };

    create_function(&name, FunctionSubtype::VariadicCall, ctx, args)
}
