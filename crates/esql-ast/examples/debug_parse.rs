use esql_ast::parser::{EsqlParser, Rule};
use pest::Parser;

fn main() {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "FROM logs | WHERE status >= 500 | STATS c = COUNT(*) BY host".to_string());

    match EsqlParser::parse(Rule::single_statement, &input) {
        Ok(pairs) => {
            for pair in pairs {
                print_pair(&pair, 0);
            }
        }
        Err(e) => println!("Error: {:?}", e),
    }

    match esql_ast::parse(&input) {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("Error: {:?}", e),
        },
        Err(e) => println!("Error: {:?}", e),
    }
}

fn print_pair(pair: &pest::iterators::Pair<Rule>, indent: usize) {
    let indent_str = "  ".repeat(indent);
    println!("{}Rule::{:?} = {:?}", indent_str, pair.as_rule(), pair.as_str());
    for inner in pair.clone().into_inner() {
        print_pair(&inner, indent + 1);
    }
}
