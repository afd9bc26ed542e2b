use pest::iterators::Pair;

use super::create_command;
use super::dissect::visit_subject_and_pattern;
use crate::ast::Command;
use crate::parser::Rule;

pub fn create_grok_command(ctx: &Pair<'_, Rule>) -> Command {
    let mut command = create_command("grok", ctx);
    command.args = visit_subject_and_pattern(ctx);
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::PairExt;
    use crate::parser::EsqlParser;
    use pest::Parser;

    #[test]
    fn test_grok_subject_and_pattern() {
        let root = EsqlParser::parse(
            Rule::single_statement,
            "FROM a | GROK line \"%{IP:ip} %{WORD:verb}\"",
        )
        .unwrap()
        .next()
        .unwrap();
        let command = create_grok_command(&root.child(Rule::grok_command).unwrap());
        assert_eq!(command.name, "grok");
        assert_eq!(command.args.len(), 2);
        assert_eq!(command.args[0].name(), "line");
        assert_eq!(command.args[1].text(), "\"%{IP:ip} %{WORD:verb}\"");
    }

    #[test]
    fn test_grok_without_pattern() {
        let root = EsqlParser::parse(Rule::single_statement, "FROM a | GROK line")
            .unwrap()
            .next()
            .unwrap();
        let command = create_grok_command(&root.child(Rule::grok_command).unwrap());
        assert_eq!(command.args.len(), 1);
    }
}
