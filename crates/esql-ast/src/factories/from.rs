//! FROM and TS (time series) source commands.

use pest::iterators::Pair;

use super::{create_column, create_command, create_option, create_source};
use crate::ast::*;
use crate::cst::PairExt;
use crate::parser::Rule;

/// Sources of an `index_pattern_and_metadata_fields` node, in written order.
pub fn visit_sources(ctx: Option<&Pair<'_, Rule>>) -> Vec<Source> {
    let Some(patterns) = ctx else {
        return Vec::new();
    };
    patterns
        .children_of(Rule::index_pattern)
        .iter()
        .map(create_source)
        .collect()
}

fn visit_metadata(ctx: Option<&Pair<'_, Rule>>) -> Vec<Expression> {
    let Some(metadata) = ctx.and_then(|patterns| patterns.child(Rule::metadata)) else {
        return Vec::new();
    };
    let columns = metadata
        .children_of(Rule::qualified_name)
        .iter()
        .map(create_column)
        .collect();
    vec![create_option("metadata", &metadata, columns)]
}

pub fn create_from_command(ctx: &Pair<'_, Rule>) -> Command {
    let mut command = create_command("from", ctx);
    let patterns = ctx.child(Rule::index_pattern_and_metadata_fields);

    command
        .args
        .extend(visit_sources(patterns.as_ref()).into_iter().map(Expression::Source));
    command.args.extend(visit_metadata(patterns.as_ref()));
    command
}

/// Sources land in both `sources` and `args`. Metadata columns are ignored.
pub fn create_time_series_command(ctx: &Pair<'_, Rule>) -> Command {
    let mut command = create_command("ts", ctx);
    let sources = visit_sources(ctx.child(Rule::index_pattern_and_metadata_fields).as_ref());

    command.args = sources.iter().cloned().map(Expression::Source).collect();
    command.sources = sources;
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::EsqlParser;
    use pest::Parser;

    fn command<'i>(source: &'i str, rule: Rule) -> Pair<'i, Rule> {
        EsqlParser::parse(Rule::single_statement, source)
            .unwrap()
            .next()
            .unwrap()
            .child(rule)
            .unwrap()
    }

    #[test]
    fn test_from_sources_and_metadata() {
        let from = create_from_command(&command(
            "FROM remote:logs-*, metrics::failures METADATA _id, _index",
            Rule::from_command,
        ));
        assert_eq!(from.name, "from");
        assert_eq!(from.args.len(), 3);

        match &from.args[0] {
            Expression::Source(source) => {
                assert_eq!(source.index, "logs-*");
                assert_eq!(source.prefix.as_deref(), Some("remote"));
                assert_eq!(source.name, "remote:logs-*");
            }
            other => panic!("expected source, got {other:?}"),
        }
        match &from.args[1] {
            Expression::Source(source) => {
                assert_eq!(source.index, "metrics");
                assert_eq!(source.selector.as_deref(), Some("failures"));
            }
            other => panic!("expected source, got {other:?}"),
        }

        let metadata = &from.args[2];
        assert_eq!(metadata.name(), "metadata");
        let columns: Vec<_> = metadata.children().iter().map(|c| c.name()).collect();
        assert_eq!(columns, vec!["_id", "_index"]);
        assert!(from.sources.is_empty());
    }

    #[test]
    fn test_from_without_sources() {
        let from = create_from_command(&command("FROM", Rule::from_command));
        assert!(from.args.is_empty());
        assert!(from.incomplete);
    }

    #[test]
    fn test_time_series_duplicates_sources() {
        let ts = create_time_series_command(&command("TS k8s, \"my-index\"", Rule::time_series_command));
        assert_eq!(ts.name, "ts");
        assert_eq!(ts.sources.len(), 2);
        assert_eq!(ts.sources[1].index, "my-index");
        assert_eq!(ts.args.len(), 2);
        assert!(matches!(&ts.args[0], Expression::Source(s) if *s == ts.sources[0]));
    }
}
