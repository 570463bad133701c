//! 命令执行器
//!
//! 负责执行各 CLI 子命令，返回要输出到 stdout 的 JSON 文本。

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use crate::{EvaluationContext, Node, RuleEngine, serializer};

/// 命令执行器
pub struct CommandRunner {
    engine: RuleEngine,
    traced_engine: RuleEngine,
    trace_enabled: bool,
}

impl CommandRunner {
    /// `trace_enabled` 来自配置，为 true 时所有评估都输出追踪
    pub fn new(trace_enabled: bool) -> Self {
        Self {
            engine: RuleEngine::new(),
            traced_engine: RuleEngine::new().with_trace(),
            trace_enabled,
        }
    }

    /// 执行 parse 命令
    pub fn run_parse(&self, rule: &str) -> Result<String> {
        let ast = self.engine.create_rule(rule).context("规则解析失败")?;
        Ok(serde_json::to_string_pretty(&serializer::to_json(&ast)?)?)
    }

    /// 执行 combine 命令
    pub fn run_combine(&self, rules: &[String]) -> Result<String> {
        let ast = self.engine.combine_rules(rules).context("规则合并失败")?;
        Ok(serde_json::to_string_pretty(&serializer::to_json(&ast)?)?)
    }

    /// 执行 evaluate 命令
    pub fn run_evaluate(
        &self,
        rule: Option<&str>,
        ast_path: Option<&Path>,
        data: &str,
        trace: bool,
    ) -> Result<String> {
        let root = match (rule, ast_path) {
            (Some(rule), _) => Some(self.engine.create_rule(rule).context("规则解析失败")?),
            (None, Some(path)) => Self::load_ast(path)?,
            (None, None) => anyhow::bail!("必须提供 --rule 或 --ast"),
        };

        let context = EvaluationContext::from_json(data)
            .context("数据记录必须是仅含数字、字符串或布尔值的 JSON 对象")?;

        if trace || self.trace_enabled {
            let result = self
                .traced_engine
                .evaluate_traced(root.as_ref(), &context)
                .context("规则评估失败")?;
            return Ok(serde_json::to_string_pretty(&json!({
                "result": result.matched,
                "trace": result.evaluation_trace,
                "evaluation_time_ms": result.evaluation_time_ms,
            }))?);
        }

        let matched = match root.as_ref() {
            Some(node) => self.engine.evaluate(node, &context),
            None => Ok(false),
        }
        .context("规则评估失败")?;

        Ok(serde_json::to_string_pretty(&json!({ "result": matched }))?)
    }

    fn load_ast(path: &Path) -> Result<Option<Node>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("无法读取 AST 文件: {}", path.display()))?;
        let ast = serializer::from_json_str(&content)
            .with_context(|| format!("AST 文件格式无效: {}", path.display()))?;

        info!(path = %path.display(), "已加载 AST 文件");
        Ok(ast)
    }
}
