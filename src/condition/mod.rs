//! Condition parsing and evaluation module
//!
//! This module handles parsing move-route condition strings like
//! "S3 & V5>=10 | PD<=2" and evaluating them against a `ConditionSource`.

mod ast;
pub mod cache;
mod evaluator;
pub mod parser;


pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use parser::*;
