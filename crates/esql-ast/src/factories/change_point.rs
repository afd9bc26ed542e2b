//! `CHANGE_POINT value [ON key] [AS type_name, pvalue_name]`

use pest::iterators::Pair;

use super::{create_column, create_command, create_option};
use crate::ast::Command;
use crate::cst::PairExt;
use crate::parser::Rule;

pub fn create_change_point_command(ctx: &Pair<'_, Rule>) -> Command {
    let mut command = create_command("change_point", ctx);

    if let Some(value) = ctx.child(Rule::qualified_name) {
        command.args.push(create_column(&value));
    }
    if let Some(on) = ctx.child(Rule::change_point_on) {
        if let Some(key) = on.child(Rule::qualified_name) {
            command.args.push(create_option("on", &on, vec![create_column(&key)]));
        }
    }
    if let Some(as_clause) = ctx.child(Rule::change_point_as) {
        let names = as_clause.children_of(Rule::qualified_name);
        if names.len() == 2 {
            let columns = names.iter().map(create_column).collect();
            command.args.push(create_option("as", &as_clause, columns));
        }
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::EsqlParser;
    use pest::Parser;

    fn change_point(source: &str) -> Command {
        let root = EsqlParser::parse(Rule::single_statement, source)
            .unwrap()
            .next()
            .unwrap();
        create_change_point_command(&root.child(Rule::change_point_command).unwrap())
    }

    #[test]
    fn test_full_change_point() {
        let command = change_point("FROM a | CHANGE_POINT value ON @timestamp AS kind, pvalue");
        let names: Vec<_> = command.args.iter().map(|arg| arg.name()).collect();
        assert_eq!(names, vec!["value", "on", "as"]);
        assert_eq!(command.args[2].children().len(), 2);
    }

    #[test]
    fn test_partial_as_pair_is_dropped() {
        let command = change_point("FROM a | CHANGE_POINT value AS kind");
        assert_eq!(command.args.len(), 1);

        let command = change_point("FROM a | CHANGE_POINT value ON");
        assert_eq!(command.args.len(), 1);
    }
}
