use pest::iterators::Pair;

use super::create_command;
use crate::ast::Command;
use crate::cst::PairExt;
use crate::parser::Rule;
use crate::walkers::collect_all_fields;

pub fn create_row_command(ctx: &Pair<'_, Rule>) -> Command {
    let mut command = create_command("row", ctx);
    command.args = collect_all_fields(ctx.child(Rule::fields).as_ref());
    command
}
