//! 规则合并
//!
//! 把多条规则用 OR 从左到右折叠成一棵树。

use crate::error::{Result, RuleError};
use crate::models::{MAX_DEPTH, Node};
use crate::operators::Operator;
use crate::parser;
use tracing::debug;

/// 合并多条规则文本
///
/// 只有一条规则时直接返回其 AST，不包 OR；多条规则时结果是左深树：
/// `combine([a, b, c]) == OR(OR(a, b), c)`。
pub fn combine<S: AsRef<str>>(rule_texts: &[S]) -> Result<Node> {
    let trees = rule_texts
        .iter()
        .map(|text| parser::parse(text.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let combined = combine_nodes(trees)?;
    debug!(rule_count = rule_texts.len(), "规则合并完成");
    Ok(combined)
}

/// 合并已经解析好的 AST，合并后的层数不能超过 [`MAX_DEPTH`]
pub fn combine_nodes(trees: Vec<Node>) -> Result<Node> {
    let mut trees = trees.into_iter();
    let first = trees.next().ok_or(RuleError::NoRulesProvided)?;
    let mut depth = first.depth();

    trees.try_fold(first, |acc, tree| {
        depth = depth.max(tree.depth()) + 1;
        if depth > MAX_DEPTH {
            return Err(RuleError::too_deep(depth));
        }
        Ok(Node::binary(Operator::Or, acc, tree))
    })
}
