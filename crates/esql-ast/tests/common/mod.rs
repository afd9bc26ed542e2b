use esql_ast::{parse, Command, ParseResult};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness. `RUST_LOG=esql_ast=trace`
/// shows every built command.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn parse_ok(source: &str) -> ParseResult {
    init_tracing();
    parse(source).expect("grammar accepts any input")
}

pub fn commands(source: &str) -> Vec<Command> {
    parse_ok(source).ast
}

pub fn command(source: &str, index: usize) -> Command {
    let mut ast = commands(source);
    assert!(index < ast.len(), "no command {index} in {source:?}");
    ast.swap_remove(index)
}
