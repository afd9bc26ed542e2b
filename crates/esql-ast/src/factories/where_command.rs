use pest::iterators::Pair;

use super::create_command;
use super::expressions::visit_expression;
use crate::ast::Command;
use crate::cst::PairExt;
use crate::parser::Rule;

pub fn create_where_command(ctx: &Pair<'_, Rule>) -> Command {
    let mut command = create_command("where", ctx);
    if let Some(condition) = ctx.child(Rule::boolean_expression) {
        command.args.push(visit_expression(&condition));
    }
    command
}
