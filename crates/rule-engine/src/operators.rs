//! 规则操作符定义

use std::fmt;

/// 规则文本中可识别的操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // 逻辑
    And,
    Or,

    // 比较
    Gt,
    Lt,
    Eq,
    Gte,
    Lte,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Self::And,
        Self::Or,
        Self::Gt,
        Self::Lt,
        Self::Eq,
        Self::Gte,
        Self::Lte,
    ];

    /// 规则文本和 AST JSON 中使用的符号
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "=",
            Self::Gte => ">=",
            Self::Lte => "<=",
        }
    }

    /// 按符号查找操作符，大小写敏感
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 操作符节点上携带的符号
///
/// 解析规则文本只会产生 `Known`；`Unknown` 只能来自反序列化的 AST JSON
/// 或手工构造，评估时报 `UnknownOperator`。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperatorSymbol {
    Known(Operator),
    Unknown(String),
}

impl OperatorSymbol {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(op) => op.symbol(),
            Self::Unknown(s) => s,
        }
    }
}

impl From<Operator> for OperatorSymbol {
    fn from(op: Operator) -> Self {
        Self::Known(op)
    }
}

impl From<&str> for OperatorSymbol {
    fn from(symbol: &str) -> Self {
        match Operator::from_symbol(symbol) {
            Some(op) => Self::Known(op),
            None => Self::Unknown(symbol.to_string()),
        }
    }
}

impl fmt::Display for OperatorSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
