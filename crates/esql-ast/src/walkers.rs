//! Walkers over repeated and optional clauses shared by several commands.
//!
//! Every walker returns a flat `Vec<Expression>` in source order. An absent
//! clause yields an empty vector.

use pest::iterators::Pair;

use crate::ast::*;
use crate::cst::{is_error, PairExt};
use crate::factories::expressions::visit_expression;
use crate::factories::{
    create_column, create_function, create_option, create_policy_source, create_unknown,
};
use crate::parser::Rule;
use crate::position::{location_of, text_is_valid, text_of};

/// Entries of a `fields` node: `name = expr` assignments or bare expressions.
pub fn collect_all_fields(ctx: Option<&Pair<'_, Rule>>) -> Vec<Expression> {
    let Some(fields) = ctx else {
        return Vec::new();
    };
    fields
        .children_of(Rule::field)
        .iter()
        .map(visit_field)
        .collect()
}

pub fn visit_field(ctx: &Pair<'_, Rule>) -> Expression {
    let mut children = ctx.children();
    let Some(first) = children.next() else {
        return create_unknown(ctx);
    };
    if first.as_rule() != Rule::qualified_name {
        return visit_expression(&first);
    }

    let mut args = vec![create_column(&first)];
    args.extend(children.find(|value| !is_error(value)).map(|value| visit_expression(&value)));
    let mut assignment = create_function("=", FunctionSubtype::BinaryExpression, ctx, args);
    if assignment.children().len() < 2 {
        assignment.set_incomplete();
    }
    assignment
}

/// Entries of an `agg_fields` node. A per-aggregation `WHERE` filter wraps
/// the field in `where(field, condition)`.
pub fn collect_all_agg_fields(ctx: Option<&Pair<'_, Rule>>) -> Vec<Expression> {
    let Some(agg_fields) = ctx else {
        return Vec::new();
    };
    agg_fields
        .children_of(Rule::agg_field)
        .iter()
        .filter_map(|agg_field| {
            let field = visit_field(&agg_field.child(Rule::field)?);
            Some(match agg_field.child(Rule::boolean_expression) {
                Some(condition) => create_function(
                    "where",
                    FunctionSubtype::BinaryExpression,
                    agg_field,
                    vec![field, visit_expression(&condition)],
                ),
                None => field,
            })
        })
        .collect()
}

/// `BY` clause of STATS / INLINESTATS as a single `by` option.
pub fn visit_by_option(ctx: &Pair<'_, Rule>) -> Vec<Expression> {
    let Some(by_clause) = ctx.child(Rule::by_clause) else {
        return Vec::new();
    };
    let fields = collect_all_fields(by_clause.child(Rule::fields).as_ref());
    vec![create_option("by", &by_clause, fields)]
}

pub fn visit_order_expressions(ctxs: &[Pair<'_, Rule>]) -> Vec<Expression> {
    ctxs.iter().map(visit_order_expression).collect()
}

fn visit_order_expression(ctx: &Pair<'_, Rule>) -> Expression {
    let args: Vec<Expression> = ctx
        .child(Rule::boolean_expression)
        .map(|expression| visit_expression(&expression))
        .into_iter()
        .collect();

    let order = match ctx.child(Rule::ordering) {
        Some(ordering) if ordering.as_str().eq_ignore_ascii_case("desc") => SortDirection::Desc,
        _ => SortDirection::Asc,
    };
    let nulls = match ctx
        .child(Rule::nulls_ordering)
        .and_then(|nulls| nulls.child(Rule::nulls_position))
    {
        Some(position) if position.as_str().eq_ignore_ascii_case("first") => NullsOrder::First,
        Some(_) => NullsOrder::Last,
        None => NullsOrder::Unspecified,
    };

    Expression::Order(Order {
        incomplete: args.iter().any(Expression::incomplete),
        args,
        order,
        nulls,
        name: "order".to_string(),
        text: text_of(ctx),
        location: location_of(ctx),
    })
}

/// `old AS new` clauses as `as` options. A clause missing its new name is
/// kept, marked incomplete.
pub fn visit_rename_clauses(ctxs: &[Pair<'_, Rule>]) -> Vec<Expression> {
    ctxs.iter()
        .map(|clause| {
            let names: Vec<Expression> = clause
                .children_of(Rule::qualified_name_pattern)
                .iter()
                .map(create_column)
                .collect();
            let complete = names.len() == 2;
            let mut option = create_option("as", clause, names);
            if !complete {
                option.set_incomplete();
            }
            option
        })
        .collect()
}

/// Column references of KEEP / DROP / MV_EXPAND, duplicates included.
pub fn collect_all_column_identifiers(ctx: &Pair<'_, Rule>) -> Vec<Expression> {
    let mut columns = Vec::new();
    for child in ctx.children() {
        match child.as_rule() {
            Rule::qualified_name_patterns => {
                columns.extend(child.children().map(|pattern| create_column(&pattern)))
            }
            Rule::qualified_name | Rule::qualified_name_pattern => {
                columns.push(create_column(&child))
            }
            _ => {}
        }
    }
    columns
}

/// Policy reference of ENRICH.
pub fn get_policy_name(ctx: &Pair<'_, Rule>) -> Vec<Expression> {
    let policy = ctx.child(Rule::enrich_policy_name);
    if !text_is_valid(policy.as_ref()) {
        return Vec::new();
    }
    policy
        .map(|policy| Expression::Source(create_policy_source(&policy)))
        .into_iter()
        .collect()
}

/// `ON <field>` of ENRICH.
pub fn get_match_field(ctx: &Pair<'_, Rule>) -> Vec<Expression> {
    let Some(enrich_on) = ctx.child(Rule::enrich_on) else {
        return Vec::new();
    };
    let args: Vec<Expression> = enrich_on
        .child(Rule::qualified_name_pattern)
        .map(|field| create_column(&field))
        .into_iter()
        .collect();
    let missing_field = args.is_empty();
    let mut option = create_option("on", &enrich_on, args);
    if missing_field {
        option.set_incomplete();
    }
    vec![option]
}

/// `WITH` clause list of ENRICH. `new = field` becomes `=(new, field)`, a
/// bare field stays a column.
pub fn get_enrich_clauses(ctx: &Pair<'_, Rule>) -> Vec<Expression> {
    let Some(enrich_with) = ctx.child(Rule::enrich_with) else {
        return Vec::new();
    };
    let clauses: Vec<Expression> = enrich_with
        .children_of(Rule::enrich_with_clause)
        .iter()
        .map(|clause| {
            let mut names: Vec<Expression> = clause
                .children_of(Rule::qualified_name_pattern)
                .iter()
                .map(create_column)
                .collect();
            if names.len() == 1 {
                names.remove(0)
            } else {
                create_function("=", FunctionSubtype::BinaryExpression, clause, names)
            }
        })
        .collect();
    let missing_clauses = clauses.is_empty();
    let mut option = create_option("with", &enrich_with, clauses);
    if missing_clauses {
        option.set_incomplete();
    }
    vec![option]
}
