//! 规则引擎门面
//!
//! 供路由、存储等外部协作方调用的统一入口：创建、合并、评估规则。

use crate::combiner;
use crate::error::Result;
use crate::executor::RuleExecutor;
use crate::models::{EvaluationContext, EvaluationResult, Node};
use crate::parser;
use crate::serializer;
use serde::Deserialize;
use tracing::{info, instrument};

/// 规则引擎
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    executor: RuleExecutor,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            executor: RuleExecutor::new(),
        }
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.executor = self.executor.with_trace();
        self
    }

    /// 解析规则文本
    #[instrument(skip(self))]
    pub fn create_rule(&self, rule_string: &str) -> Result<Node> {
        let ast = parser::parse(rule_string)?;
        info!(ast = %ast, "规则已创建");
        Ok(ast)
    }

    /// 合并多条规则文本
    #[instrument(skip(self, rule_strings), fields(rule_count = rule_strings.len()))]
    pub fn combine_rules<S: AsRef<str>>(&self, rule_strings: &[S]) -> Result<Node> {
        let ast = combiner::combine(rule_strings)?;
        info!(ast = %ast, "规则已合并");
        Ok(ast)
    }

    /// 对记录评估 AST
    pub fn evaluate(&self, root: &Node, context: &EvaluationContext) -> Result<bool> {
        self.executor.evaluate(Some(root), context)
    }

    /// 评估存储形式的 AST JSON，`data` 必须是 JSON 对象
    #[instrument(skip(self, ast_json, data))]
    pub fn evaluate_rule(
        &self,
        ast_json: &serde_json::Value,
        data: &serde_json::Value,
    ) -> Result<bool> {
        let root = serializer::from_json(ast_json)?;
        let context = EvaluationContext::deserialize(data)?;

        let matched = self.executor.evaluate(root.as_ref(), &context)?;
        info!(matched, "规则评估完成");
        Ok(matched)
    }

    /// 评估并返回追踪信息和耗时
    #[instrument(skip(self, root, context))]
    pub fn evaluate_traced(
        &self,
        root: Option<&Node>,
        context: &EvaluationContext,
    ) -> Result<EvaluationResult> {
        let result = self.executor.execute(root, context)?;
        info!(
            matched = result.matched,
            elapsed_ms = result.evaluation_time_ms,
            "规则评估完成"
        );
        Ok(result)
    }
}
