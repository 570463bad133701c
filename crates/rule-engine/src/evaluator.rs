//! 操作数解析与操作符求值
//!
//! 操作数先按字段名查记录，查不到再尝试解析为数字，最后按原字符串处理。
//! 相等比较是严格的（类型不同即不等）；大小比较在两边都是数字时按数值，
//! 否则按字符串形式的字典序。

use crate::models::{EvaluationContext, Value};
use crate::operators::Operator;
use std::cmp::Ordering;

/// 条件评估器
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 解析操作数 token
    pub fn resolve_operand(token: &str, context: &EvaluationContext) -> Value {
        if let Some(value) = context.get_field(token) {
            return value.clone();
        }

        match Self::parse_number(token) {
            Some(n) => Value::Number(n),
            None => Value::String(token.to_string()),
        }
    }

    /// 对两侧已求值的结果应用操作符
    pub fn apply(operator: Operator, left: &Value, right: &Value) -> bool {
        match operator {
            Operator::And => left.is_truthy() && right.is_truthy(),
            Operator::Or => left.is_truthy() || right.is_truthy(),
            Operator::Eq => Self::strict_eq(left, right),
            Operator::Gt => matches!(Self::ordering(left, right), Some(Ordering::Greater)),
            Operator::Lt => matches!(Self::ordering(left, right), Some(Ordering::Less)),
            Operator::Gte => matches!(
                Self::ordering(left, right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Lte => matches!(
                Self::ordering(left, right),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }

    /// 严格相等：类型相同且值相等
    fn strict_eq(left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }

    /// 两边都是数字时按数值比较（NaN 不可比），否则比较字符串形式
    fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            _ => Some(left.to_string().cmp(&right.to_string())),
        }
    }

    /// 数字字面量解析
    ///
    /// 不含数字的 token 一律不算数字，排除 `inf`、`nan` 这类拼写；
    /// `Infinity` 例外。
    fn parse_number(token: &str) -> Option<f64> {
        match token {
            "Infinity" | "+Infinity" => return Some(f64::INFINITY),
            "-Infinity" => return Some(f64::NEG_INFINITY),
            _ => {}
        }

        if !token.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }

        token.parse().ok()
    }
}
