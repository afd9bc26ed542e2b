//! STATS and INLINESTATS share one shape: aggregates, then the `BY` option.

use pest::iterators::Pair;

use super::create_command;
use crate::ast::Command;
use crate::cst::PairExt;
use crate::parser::Rule;
use crate::walkers::{collect_all_agg_fields, visit_by_option};

pub fn create_stats_command(name: &str, ctx: &Pair<'_, Rule>) -> Command {
    let mut command = create_command(name, ctx);
    if let Some(agg_fields) = ctx.child(Rule::agg_fields) {
        command.args.extend(collect_all_agg_fields(Some(&agg_fields)));
    }
    if ctx.has_child(Rule::by_clause) {
        command.args.extend(visit_by_option(ctx));
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::EsqlParser;
    use pest::Parser;

    fn stats(source: &str, rule: Rule, name: &str) -> Command {
        let root = EsqlParser::parse(Rule::single_statement, source)
            .unwrap()
            .next()
            .unwrap();
        create_stats_command(name, &root.child(rule).unwrap())
    }

    #[test]
    fn test_stats_without_by() {
        let command = stats("FROM a | STATS AVG(x), MAX(y)", Rule::stats_command, "stats");
        assert_eq!(command.args.len(), 2);
        assert!(command.args.iter().all(|arg| arg.name() != "by"));
    }

    #[test]
    fn test_stats_by_keeps_order() {
        let command = stats("FROM a | STATS c = COUNT(*) BY a, b", Rule::stats_command, "stats");
        assert_eq!(command.args.len(), 2);
        let by: Vec<_> = command.args[1].children().iter().map(|f| f.name()).collect();
        assert_eq!(by, vec!["a", "b"]);
    }

    #[test]
    fn test_inlinestats_gates_each_half() {
        let command = stats("FROM a | INLINESTATS BY host", Rule::inlinestats_command, "inlinestats");
        assert_eq!(command.name, "inlinestats");
        assert_eq!(command.args.len(), 1);
        assert_eq!(command.args[0].name(), "by");
    }
}
