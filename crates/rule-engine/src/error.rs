//! 规则引擎错误类型

use crate::models::MAX_DEPTH;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("无效的规则输入: {0}")]
    InvalidInput(String),

    #[error("未提供任何规则")]
    NoRulesProvided,

    #[error("未知的操作符: {0}")]
    UnknownOperator(String),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuleError>;

impl RuleError {
    /// 树的层数超过 [`MAX_DEPTH`]
    pub(crate) fn too_deep(depth: usize) -> Self {
        Self::InvalidInput(format!("规则嵌套层数 {} 超过上限 {}", depth, MAX_DEPTH))
    }
}
