//! 规则执行器
//!
//! 遍历 AST 对记录求值，可选记录评估追踪信息。
//! AND/OR 两侧都会求值，不做短路。缺失的节点按 `false` 处理，不报错。
//! 超过 [`MAX_DEPTH`] 层的树直接拒绝。

use crate::error::{Result, RuleError};
use crate::evaluator::ConditionEvaluator;
use crate::models::{EvaluationContext, EvaluationResult, MAX_DEPTH, Node, Value};
use crate::operators::OperatorSymbol;
use std::time::Instant;
use tracing::warn;

/// 规则执行器
#[derive(Debug, Clone, Default)]
pub struct RuleExecutor {
    /// 是否记录详细评估追踪
    trace_enabled: bool,
}

impl RuleExecutor {
    pub fn new() -> Self {
        Self {
            trace_enabled: false,
        }
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    pub fn trace_enabled(&self) -> bool {
        self.trace_enabled
    }

    /// 求值并返回布尔结果
    pub fn evaluate(&self, root: Option<&Node>, context: &EvaluationContext) -> Result<bool> {
        let mut result = EvaluationResult::default();
        let value = self.evaluate_node(root, context, &mut result, "root", 1)?;
        Ok(value.is_truthy())
    }

    /// 执行规则评估，返回结果、追踪和耗时
    pub fn execute(&self, root: Option<&Node>, context: &EvaluationContext) -> Result<EvaluationResult> {
        let start = Instant::now();

        let mut result = EvaluationResult::default();
        let value = self.evaluate_node(root, context, &mut result, "root", 1)?;

        result.matched = value.is_truthy();
        result.evaluation_time_ms = start.elapsed().as_millis() as i64;

        Ok(result)
    }

    /// 递归求值节点
    fn evaluate_node(
        &self,
        node: Option<&Node>,
        context: &EvaluationContext,
        result: &mut EvaluationResult,
        path: &str,
        depth: usize,
    ) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(RuleError::too_deep(depth));
        }

        let Some(node) = node else {
            warn!(path, "节点缺失，按 false 处理");
            if self.trace_enabled {
                result
                    .evaluation_trace
                    .push(format!("{}: 节点缺失 => false", path));
            }
            return Ok(Value::Bool(false));
        };

        match node {
            Node::Operand { token } => {
                let value = ConditionEvaluator::resolve_operand(token, context);

                if self.trace_enabled {
                    result
                        .evaluation_trace
                        .push(format!("{}: {} => {} ({})", path, token, value, value.type_name()));
                }

                Ok(value)
            }
            Node::Operator {
                symbol,
                left,
                right,
            } => {
                let left_path = format!("{}.left", path);
                let right_path = format!("{}.right", path);
                let left_value =
                    self.evaluate_node(left.as_deref(), context, result, &left_path, depth + 1)?;
                let right_value =
                    self.evaluate_node(right.as_deref(), context, result, &right_path, depth + 1)?;

                let operator = match symbol {
                    OperatorSymbol::Known(op) => *op,
                    OperatorSymbol::Unknown(s) => {
                        return Err(RuleError::UnknownOperator(s.clone()));
                    }
                };

                let matched = ConditionEvaluator::apply(operator, &left_value, &right_value);

                if self.trace_enabled {
                    result.evaluation_trace.push(format!(
                        "{}: {} {} {} => {}",
                        path,
                        left_value,
                        operator,
                        right_value,
                        if matched { "MATCHED" } else { "NOT_MATCHED" }
                    ));
                }

                Ok(Value::Bool(matched))
            }
        }
    }
}
