//! `LOOKUP JOIN index [AS alias] ON cond, ...`

use pest::iterators::Pair;
use tracing::debug;

use super::expressions::visit_expression;
use super::{create_command, create_identifier, create_option, create_source};
use crate::ast::*;
use crate::cst::PairExt;
use crate::parser::Rule;

pub fn create_join_command(ctx: &Pair<'_, Rule>) -> Command {
    let mut command = create_command("join", ctx);

    if let Some(join_type) = ctx.child(Rule::join_type) {
        let mut kind = create_identifier(&join_type);
        if let Expression::Identifier(identifier) = &mut kind {
            identifier.name = identifier.name.to_ascii_lowercase();
        }
        command.args.push(kind);
    }
    if let Some(target) = ctx.child(Rule::join_target) {
        command.args.extend(visit_join_target(&target));
    }
    if let Some(condition) = ctx.child(Rule::join_condition) {
        command.args.push(visit_join_condition(&condition));
    }
    command
}

/// Target index, wrapped in an `as` option when it is aliased.
fn visit_join_target(ctx: &Pair<'_, Rule>) -> Option<Expression> {
    let source = Expression::Source(create_source(&ctx.child(Rule::index_pattern)?));
    let alias = ctx
        .children()
        .find(|child| matches!(child.as_rule(), Rule::unquoted_identifier | Rule::quoted_identifier));

    Some(match alias {
        Some(alias) => create_option("as", ctx, vec![source, create_identifier(&alias)]),
        None if ctx.has_child(Rule::KW_AS) => {
            let mut option = create_option("as", ctx, vec![source]);
            option.set_incomplete();
            option
        }
        None => source,
    })
}

/// `ON` conditions as an `on` option. One condition (or none) is a direct
/// argument. Two or more distinct conditions become a single `allOf`
/// grouping argument. Repeated conditions fail grouping and stay flat.
fn visit_join_condition(ctx: &Pair<'_, Rule>) -> Expression {
    let conditions: Vec<Expression> = ctx
        .children_of(Rule::boolean_expression)
        .iter()
        .map(visit_expression)
        .collect();

    if conditions.len() < 2 {
        return create_option("on", ctx, conditions);
    }
    match Grouping::all_of(conditions.clone()) {
        Ok(grouping) => create_option("on", ctx, vec![Expression::Grouping(grouping)]),
        Err(err) => {
            debug!(error = %err, "join conditions kept ungrouped");
            create_option("on", ctx, conditions)
        }
    }
}
