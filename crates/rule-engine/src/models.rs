//! 规则引擎领域模型

use crate::error::Result;
use crate::operators::{Operator, OperatorSymbol};
use crate::parser;
use crate::serializer::AstJson;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// AST 的最大层数，根节点为第 1 层。
///
/// 解析、合并、JSON 还原和评估都拒绝超过该层数的树，
/// 同时保证存储的 JSON 在 serde_json 的嵌套上限内。
pub const MAX_DEPTH: usize = 100;

/// AST 节点（操作数或操作符）
///
/// 每个节点独占自己的子节点。序列化格式为
/// `{ "type", "value", "left", "right" }`，见 [`crate::serializer`]。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "AstJson", from = "AstJson")]
pub enum Node {
    Operand {
        token: String,
    },
    Operator {
        symbol: OperatorSymbol,
        left: Option<Box<Node>>,
        right: Option<Box<Node>>,
    },
}

impl Node {
    pub fn operand(token: impl Into<String>) -> Self {
        Self::Operand {
            token: token.into(),
        }
    }

    /// 构造操作符节点，子节点允许缺失
    pub fn operator(
        symbol: impl Into<OperatorSymbol>,
        left: Option<Node>,
        right: Option<Node>,
    ) -> Self {
        Self::Operator {
            symbol: symbol.into(),
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    /// 构造左右子节点齐全的操作符节点
    pub fn binary(op: Operator, left: Node, right: Node) -> Self {
        Self::operator(op, Some(left), Some(right))
    }

    pub fn is_operand(&self) -> bool {
        matches!(self, Self::Operand { .. })
    }

    pub fn symbol(&self) -> Option<&OperatorSymbol> {
        match self {
            Self::Operator { symbol, .. } => Some(symbol),
            Self::Operand { .. } => None,
        }
    }

    pub fn left(&self) -> Option<&Node> {
        match self {
            Self::Operator { left, .. } => left.as_deref(),
            Self::Operand { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&Node> {
        match self {
            Self::Operator { right, .. } => right.as_deref(),
            Self::Operand { .. } => None,
        }
    }

    /// 操作数 token 或操作符符号
    pub fn value(&self) -> &str {
        match self {
            Self::Operand { token } => token,
            Self::Operator { symbol, .. } => symbol.as_str(),
        }
    }

    /// 树的层数，叶子节点为 1
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];

        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.left().map(|n| (n, depth + 1)));
            stack.extend(node.right().map(|n| (n, depth + 1)));
        }

        max
    }

    /// 按构建规则挂载子树：左槽为空填左槽，否则填右槽。
    ///
    /// 只有操作符节点能挂载，操作数节点会丢弃传入的子树。
    pub(crate) fn attach(&mut self, child: Option<Node>) {
        if let Self::Operator { left, right, .. } = self {
            if left.is_none() {
                *left = child.map(Box::new);
            } else {
                *right = child.map(Box::new);
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand { token } => write!(f, "{}", token),
            Self::Operator {
                symbol,
                left,
                right,
            } => {
                write!(f, "(")?;
                match left {
                    Some(node) => write!(f, "{}", node)?,
                    None => write!(f, "_")?,
                }
                write!(f, " {} ", symbol)?;
                match right {
                    Some(node) => write!(f, "{}", node)?,
                    None => write!(f, "_")?,
                }
                write!(f, ")")
            }
        }
    }
}

/// 标量值：记录字段的取值，也是操作数解析的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// 真值判断：布尔取自身，数字非 0 且非 NaN，字符串非空
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
        }
    }
}

/// 字符串形式，用于跨类型的字典序比较
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::String(s) => write!(f, "{}", s),
            Self::Number(n) if n.is_nan() => write!(f, "NaN"),
            Self::Number(n) if n.is_infinite() => {
                write!(f, "{}", if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // -0 与 0 同形
            Self::Number(n) if *n == 0.0 => write!(f, "0"),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// 评估上下文 - 提供给规则引擎的数据记录
///
/// 字段按完整名称精确匹配，不支持点号路径。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationContext {
    fields: HashMap<String, Value>,
}

impl EvaluationContext {
    pub fn new(fields: HashMap<String, Value>) -> Self {
        Self { fields }
    }

    /// 从 JSON 对象字符串创建，字段值必须是数字、字符串或布尔
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 从 JSON 值创建
    pub fn from_value(value: serde_json::Value) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EvaluationContext
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 规则定义：规则文本及其解析出的 AST
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rule_string: String,
    pub ast: Node,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    /// 解析规则文本并创建规则
    pub fn new(name: impl Into<String>, rule_string: impl Into<String>) -> Result<Self> {
        let rule_string = rule_string.into();
        let ast = parser::parse(&rule_string)?;
        let now = Utc::now();

        Ok(Self {
            name: name.into(),
            description: None,
            rule_string,
            ast,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// 评估结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationResult {
    pub matched: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evaluation_trace: Vec<String>,
    pub evaluation_time_ms: i64,
}
