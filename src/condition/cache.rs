//! Parsed move route conditions, shared process-wide
//!
//! A route's `rbIf`/`rbElse` condition text is parsed the first time any
//! route uses it. Routes that repeat, and events sharing a route, reuse the
//! tree instead of re-tokenizing the text.

use crate::condition::ast::AstNode;
use crate::condition::evaluator::{self, ConditionSource};
use crate::condition::parser;
use crate::error::Result;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Condition text to its tree; failed parses are never stored
static PARSED_CONDITIONS: Lazy<RwLock<AHashMap<String, AstNode>>> =
    Lazy::new(|| RwLock::new(AHashMap::with_capacity(64)));

/// Tree for `condition`, parsing it on first use
pub fn get_or_parse(condition: &str) -> Result<AstNode> {
    if let Some(ast) = PARSED_CONDITIONS.read().get(condition) {
        return Ok(ast.clone());
    }
    let ast = parser::parse(condition)?;
    PARSED_CONDITIONS
        .write()
        .entry(condition.to_string())
        .or_insert_with(|| ast.clone());
    Ok(ast)
}

/// Parse (or reuse) `condition` and evaluate it; blank text holds
pub fn check_condition<S: ConditionSource + ?Sized>(condition: &str, source: &S) -> Result<bool> {
    if condition.trim().is_empty() {
        return Ok(true);
    }
    Ok(evaluator::check(&get_or_parse(condition)?, source))
}

#[cfg(test)]
fn cached_count() -> usize {
    PARSED_CONDITIONS.read().len()
}
