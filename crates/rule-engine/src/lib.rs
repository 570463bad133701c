//! 规则表达式引擎
//!
//! 提供规则文本到 AST 的完整处理能力，支持：
//! - 规则文本分词与 AST 构建（按 token 顺序左嵌套，括号限定范围）
//! - 多条规则的 OR 合并
//! - AST 与 JSON 之间的互相转换
//! - 针对数据记录的评估

pub mod cli;
pub mod combiner;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod models;
pub mod operators;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use combiner::{combine, combine_nodes};
pub use engine::RuleEngine;
pub use error::{Result, RuleError};
pub use evaluator::ConditionEvaluator;
pub use executor::RuleExecutor;
pub use models::{EvaluationContext, EvaluationResult, MAX_DEPTH, Node, Rule, Value};
pub use operators::{Operator, OperatorSymbol};
pub use parser::{build_ast, parse};
pub use serializer::{from_json, from_json_str, to_json, NodeKind};
pub use tokenizer::tokenize;

/// 对记录评估 AST
pub fn evaluate(root: &Node, context: &EvaluationContext) -> Result<bool> {
    RuleExecutor::new().evaluate(Some(root), context)
}

/// 评估可能为空的 AST，空树结果为 `false`
pub fn evaluate_tree(root: Option<&Node>, context: &EvaluationContext) -> Result<bool> {
    RuleExecutor::new().evaluate(root, context)
}
