//! AST builder
//!
//! [`AstBuilder`] listens to a CST walk and appends one [`Command`] each time
//! a command rule exits. SHOW is the exception: its command is pushed when the
//! rule is entered and receives its `info` argument when `show_info` exits.

use std::mem;

use pest::iterators::Pair;
use tracing::{debug, trace};

use crate::ast::{Ast, Command, FunctionSubtype};
use crate::cst::{PairExt, TreeEvent, TreeListener};
use crate::factories::change_point::create_change_point_command;
use crate::factories::dissect::create_dissect_command;
use crate::factories::from::{create_from_command, create_time_series_command};
use crate::factories::grok::create_grok_command;
use crate::factories::join::create_join_command;
use crate::factories::row::create_row_command;
use crate::factories::stats::create_stats_command;
use crate::factories::where_command::create_where_command;
use crate::factories::{create_command, create_function, create_integer_literal};
use crate::parser::Rule;
use crate::position::text_is_valid;
use crate::walkers::{
    collect_all_column_identifiers, collect_all_fields, get_enrich_clauses, get_match_field,
    get_policy_name, visit_order_expressions, visit_rename_clauses,
};

#[derive(Debug, Default)]
pub struct AstBuilder {
    ast: Ast,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over with an empty AST, handing back what was accumulated.
    pub fn reset(&mut self) -> Ast {
        mem::take(&mut self.ast)
    }

    /// Commands built so far. Complete only once the walk has finished.
    pub fn get_ast(&self) -> &[Command] {
        &self.ast
    }

    pub fn into_ast(self) -> Ast {
        self.ast
    }

    fn push(&mut self, command: Command) {
        trace!(
            command = %command.name,
            min = command.location.min,
            max = command.location.max,
            incomplete = command.incomplete,
            "built command"
        );
        self.ast.push(command);
    }

    fn exit_command(&mut self, ctx: &Pair<'_, Rule>) {
        let command = match ctx.as_rule() {
            Rule::from_command => create_from_command(ctx),
            Rule::time_series_command => create_time_series_command(ctx),
            Rule::row_command => create_row_command(ctx),
            Rule::where_command => create_where_command(ctx),
            Rule::stats_command => create_stats_command("stats", ctx),
            Rule::inlinestats_command => create_stats_command("inlinestats", ctx),
            Rule::dissect_command => create_dissect_command(ctx),
            Rule::grok_command => create_grok_command(ctx),
            Rule::join_command => create_join_command(ctx),
            Rule::change_point_command => create_change_point_command(ctx),
            Rule::eval_command => {
                let mut command = create_command("eval", ctx);
                command.args = collect_all_fields(ctx.child(Rule::fields).as_ref());
                command
            }
            Rule::limit_command => {
                let mut command = create_command("limit", ctx);
                if let Some(count) = ctx.child(Rule::integer_literal) {
                    let count = create_integer_literal(&count);
                    command.incomplete |= count.incomplete();
                    command.args.push(count);
                }
                command
            }
            Rule::sort_command => {
                let mut command = create_command("sort", ctx);
                command.args = visit_order_expressions(&ctx.children_of(Rule::order_expression));
                command
            }
            Rule::keep_command | Rule::drop_command | Rule::mv_expand_command => {
                let name = match ctx.as_rule() {
                    Rule::keep_command => "keep",
                    Rule::drop_command => "drop",
                    _ => "mv_expand",
                };
                let mut command = create_command(name, ctx);
                command.args = collect_all_column_identifiers(ctx);
                command
            }
            Rule::rename_command => {
                let mut command = create_command("rename", ctx);
                command.args = visit_rename_clauses(&ctx.children_of(Rule::rename_clause));
                command
            }
            Rule::enrich_command => {
                let mut command = create_command("enrich", ctx);
                command.args.extend(get_policy_name(ctx));
                command.args.extend(get_match_field(ctx));
                command.args.extend(get_enrich_clauses(ctx));
                command
            }
            _ => return,
        };
        self.push(command);
    }

    /// Attach `info` to the SHOW command pushed on entry.
    fn exit_show_info(&mut self, ctx: &Pair<'_, Rule>) {
        let Some(info) = ctx
            .child(Rule::KW_INFO)
            .filter(|info| text_is_valid(Some(info)))
        else {
            return;
        };
        match self.ast.last_mut().filter(|command| command.name == "show") {
            Some(show) => show.args.push(create_function(
                "info",
                FunctionSubtype::VariadicCall,
                &info,
                Vec::new(),
            )),
            None => debug!("show_info outside of a SHOW command"),
        }
    }
}

impl<'i> TreeListener<'i> for AstBuilder {
    fn on_event(&mut self, event: TreeEvent<'_, 'i>) {
        match event {
            TreeEvent::Enter(ctx) => match ctx.as_rule() {
                Rule::single_statement => {
                    self.reset();
                }
                Rule::show_command => {
                    let show = create_command("show", ctx);
                    self.push(show);
                }
                _ => {}
            },
            TreeEvent::Exit(ctx) => match ctx.as_rule() {
                Rule::show_info => self.exit_show_info(ctx),
                _ => self.exit_command(ctx),
            },
            TreeEvent::Error(ctx) => {
                debug!(text = ctx.as_str(), rule = ?ctx.as_rule(), "skipping error fragment");
            }
            TreeEvent::Terminal(_) => {}
        }
    }
}
