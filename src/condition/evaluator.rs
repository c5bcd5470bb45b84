//! Condition evaluator

use crate::condition::ast::{AstNode, Property, SingleCondition};

/// Supplies property values during evaluation
pub trait ConditionSource {
    /// Current value of `property`, or `None` when it cannot be observed
    fn property(&self, property: Property) -> Option<i32>;
}

/// Evaluate an AST against a ConditionSource
pub fn check<S: ConditionSource + ?Sized>(ast: &AstNode, source: &S) -> bool {
    match ast {
        AstNode::Single(cond) => check_single(cond, source),
        AstNode::Literal(value) => *value,
        AstNode::Not(inner) => !check(inner, source),
        AstNode::And(left, right) => check(left, source) && check(right, source),
        AstNode::Or(left, right) => check(left, source) || check(right, source),
    }
}

/// Unobservable properties make the comparison false
fn check_single<S: ConditionSource + ?Sized>(cond: &SingleCondition, source: &S) -> bool {
    source
        .property(cond.property)
        .is_some_and(|value| cond.operator.compare(value, cond.value))
}
