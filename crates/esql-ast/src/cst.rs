//! Concrete syntax tree access
//!
//! The CST is the pest parse tree produced from `esql.pest`. Consumers never
//! recurse over it themselves; [`walk`] drives a [`TreeListener`] depth-first,
//! reporting every rule entry and exit in source order.

use pest::iterators::{Pair, Pairs};

use crate::parser::Rule;

/// Notification delivered to a [`TreeListener`] during [`walk`].
#[derive(Debug, Clone, Copy)]
pub enum TreeEvent<'a, 'i> {
    /// A rule node is about to be walked. Its full span is already known.
    Enter(&'a Pair<'i, Rule>),
    /// A rule node and all its children have been walked.
    Exit(&'a Pair<'i, Rule>),
    /// Leaf token (keyword, operator, literal, identifier).
    Terminal(&'a Pair<'i, Rule>),
    /// Recovery node: an unparsable fragment or a missing token.
    Error(&'a Pair<'i, Rule>),
}

pub trait TreeListener<'i> {
    fn on_event(&mut self, event: TreeEvent<'_, 'i>);
}

/// Walk `pair` depth-first, left to right.
pub fn walk<'i, L>(listener: &mut L, pair: &Pair<'i, Rule>)
where
    L: TreeListener<'i> + ?Sized,
{
    if is_error(pair) {
        listener.on_event(TreeEvent::Error(pair));
        return;
    }

    let mut children = pair.clone().into_inner().peekable();
    if children.peek().is_none() {
        listener.on_event(TreeEvent::Terminal(pair));
        return;
    }

    listener.on_event(TreeEvent::Enter(pair));
    for child in children {
        walk(listener, &child);
    }
    listener.on_event(TreeEvent::Exit(pair));
}

pub fn is_error(pair: &Pair<'_, Rule>) -> bool {
    matches!(pair.as_rule(), Rule::error_node | Rule::missing_token)
}

/// Child lookup helpers on CST nodes. Only direct children are inspected.
pub trait PairExt<'i> {
    fn children(&self) -> Pairs<'i, Rule>;

    /// First direct child produced by `rule`.
    fn child(&self, rule: Rule) -> Option<Pair<'i, Rule>>;

    /// All direct children produced by `rule`, in source order.
    fn children_of(&self, rule: Rule) -> Vec<Pair<'i, Rule>>;

    fn has_child(&self, rule: Rule) -> bool {
        self.child(rule).is_some()
    }

    /// True when a recovery node appears anywhere below this node.
    fn contains_error(&self) -> bool;
}

impl<'i> PairExt<'i> for Pair<'i, Rule> {
    fn children(&self) -> Pairs<'i, Rule> {
        self.clone().into_inner()
    }

    fn child(&self, rule: Rule) -> Option<Pair<'i, Rule>> {
        self.children().find(|child| child.as_rule() == rule)
    }

    fn children_of(&self, rule: Rule) -> Vec<Pair<'i, Rule>> {
        self.children().filter(|child| child.as_rule() == rule).collect()
    }

    fn contains_error(&self) -> bool {
        is_error(self) || self.clone().into_inner().flatten().any(|pair| is_error(&pair))
    }
}
