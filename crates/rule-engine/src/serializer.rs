//! AST 的 JSON 表示
//!
//! 每个节点序列化为：
//!
//! ```json
//! { "type": "operator" | "operand", "value": "<符号或 token>", "left": <节点|null>, "right": <节点|null> }
//! ```
//!
//! 操作数的 `left`/`right` 恒为 `null`。整棵树为 `null` 时反序列化为 `None`，
//! 评估结果为 `false`。嵌套超过 [`MAX_DEPTH`] 层的 JSON 不会被还原。

use crate::error::{Result, RuleError};
use crate::models::{MAX_DEPTH, Node};
use crate::operators::OperatorSymbol;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 节点类型标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Operator,
    Operand,
}

/// 节点的 JSON 结构，`Node` 的 serde 实现经由它转换
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AstJson {
    #[serde(rename = "type")]
    kind: NodeKind,
    value: String,
    #[serde(default)]
    left: Option<Box<AstJson>>,
    #[serde(default)]
    right: Option<Box<AstJson>>,
}

impl From<Node> for AstJson {
    fn from(node: Node) -> Self {
        match node {
            Node::Operand { token } => Self {
                kind: NodeKind::Operand,
                value: token,
                left: None,
                right: None,
            },
            Node::Operator {
                symbol,
                left,
                right,
            } => Self {
                kind: NodeKind::Operator,
                value: symbol.as_str().to_string(),
                left: left.map(|n| Box::new(Self::from(*n))),
                right: right.map(|n| Box::new(Self::from(*n))),
            },
        }
    }
}

impl From<AstJson> for Node {
    fn from(json: AstJson) -> Self {
        match json.kind {
            // 操作数上的子节点直接丢弃
            NodeKind::Operand => Node::Operand { token: json.value },
            NodeKind::Operator => Node::Operator {
                symbol: OperatorSymbol::from(json.value.as_str()),
                left: json.left.map(|n| Box::new(Self::from(*n))),
                right: json.right.map(|n| Box::new(Self::from(*n))),
            },
        }
    }
}

/// 将 AST 转为 JSON 值
pub fn to_json(node: &Node) -> Result<Value> {
    Ok(serde_json::to_value(node)?)
}

/// 从 JSON 值还原 AST，`null` 还原为 `None`
pub fn from_json(json: &Value) -> Result<Option<Node>> {
    let depth = json_depth(json);
    if depth > MAX_DEPTH {
        return Err(RuleError::too_deep(depth));
    }

    Ok(Option::<Node>::deserialize(json)?)
}

/// 从 JSON 字符串还原 AST
pub fn from_json_str(json: &str) -> Result<Option<Node>> {
    let value: Value = serde_json::from_str(json)?;
    from_json(&value)
}

/// 对象和数组的嵌套层数，超过上限后不再继续统计
fn json_depth(json: &Value) -> usize {
    let mut max = 0;
    let mut stack = vec![(json, 0)];

    while let Some((value, depth)) = stack.pop() {
        match value {
            Value::Object(map) => stack.extend(map.values().map(|child| (child, depth + 1))),
            Value::Array(items) => stack.extend(items.iter().map(|child| (child, depth + 1))),
            _ => continue,
        }

        max = max.max(depth + 1);
        if max > MAX_DEPTH {
            break;
        }
    }

    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::operators::Operator;
    use crate::parser::parse;
    use serde_json::json;

    #[test]
    fn test_operand_to_json() {
        assert_eq!(
            to_json(&Node::operand("age")).unwrap(),
            json!({ "type": "operand", "value": "age", "left": null, "right": null })
        );
    }

    #[test]
    fn test_operator_to_json() {
        let node = parse("age >= 18").unwrap();
        assert_eq!(
            to_json(&node).unwrap(),
            json!({
                "type": "operator",
                "value": ">=",
                "left": { "type": "operand", "value": "age", "left": null, "right": null },
                "right": { "type": "operand", "value": "18", "left": null, "right": null }
            })
        );
    }

    #[test]
    fn test_missing_child_serializes_as_null() {
        let node = Node::operator(Operator::And, Some(Node::operand("a")), None);
        let json = to_json(&node).unwrap();
        assert_eq!(json["right"], Value::Null);
        assert_eq!(from_json(&json).unwrap(), Some(node));
    }

    #[test]
    fn test_round_trip() {
        let node = parse("((a = 1) OR (b > 2)) AND c <= 3").unwrap();
        let json = to_json(&node).unwrap();
        assert_eq!(from_json(&json).unwrap(), Some(node));
    }

    #[test]
    fn test_nested_to_json() {
        let node = parse("(x < 5) OR (y = z)").unwrap();
        assert_eq!(
            to_json(&node).unwrap(),
            json!({
                "type": "operator",
                "value": "OR",
                "left": {
                    "type": "operator",
                    "value": "<",
                    "left": { "type": "operand", "value": "x", "left": null, "right": null },
                    "right": { "type": "operand", "value": "5", "left": null, "right": null }
                },
                "right": {
                    "type": "operator",
                    "value": "=",
                    "left": { "type": "operand", "value": "y", "left": null, "right": null },
                    "right": { "type": "operand", "value": "z", "left": null, "right": null }
                }
            })
        );
    }

    #[test]
    fn test_null_is_empty_tree() {
        assert_eq!(from_json(&Value::Null).unwrap(), None);
        assert_eq!(from_json_str("null").unwrap(), None);
    }

    #[test]
    fn test_absent_children_default_to_none() {
        let node = from_json(&json!({ "type": "operand", "value": "x" })).unwrap();
        assert_eq!(node, Some(Node::operand("x")));
    }

    #[test]
    fn test_operand_children_ignored() {
        let node = from_json(&json!({
            "type": "operand",
            "value": "x",
            "left": { "type": "operand", "value": "y" },
            "right": null
        }))
        .unwrap();
        assert_eq!(node, Some(Node::operand("x")));
    }

    #[test]
    fn test_unknown_symbol_preserved() {
        let node = from_json(&json!({
            "type": "operator",
            "value": "!=",
            "left": { "type": "operand", "value": "a" },
            "right": { "type": "operand", "value": "b" }
        }))
        .unwrap()
        .unwrap();

        assert_eq!(
            node.symbol(),
            Some(&OperatorSymbol::Unknown("!=".to_string()))
        );
        assert_eq!(to_json(&node).unwrap()["value"], json!("!="));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = from_json(&json!({ "type": "function", "value": "f" }));
        assert!(matches!(result, Err(RuleError::JsonError(_))));

        let result = from_json_str(r#"{ "type": "operand" }"#);
        assert!(matches!(result, Err(RuleError::JsonError(_))));
    }

    /// 手工构建 `depth` 层的左深 AND 链
    fn deep_tree(depth: usize) -> Node {
        (1..depth).fold(Node::operand("a"), |acc, _| {
            Node::binary(Operator::And, acc, Node::operand("a"))
        })
    }

    #[test]
    fn test_string_round_trip_at_depth_limit() {
        let node = parse(&format!("a{}", " AND a".repeat(MAX_DEPTH - 1))).unwrap();
        assert_eq!(node.depth(), MAX_DEPTH);

        let text = serde_json::to_string(&to_json(&node).unwrap()).unwrap();
        assert_eq!(from_json_str(&text).unwrap(), Some(node));
    }

    #[test]
    fn test_long_chain_rejected_before_storage() {
        let rule = format!("a{}", " AND a".repeat(200));
        assert!(matches!(parse(&rule), Err(RuleError::InvalidInput(_))));
    }

    #[test]
    fn test_deep_json_rejected() {
        let json = to_json(&deep_tree(MAX_DEPTH + 1)).unwrap();
        assert!(matches!(from_json(&json), Err(RuleError::InvalidInput(_))));

        let text = serde_json::to_string(&to_json(&deep_tree(200)).unwrap()).unwrap();
        assert!(from_json_str(&text).is_err());
    }

    #[test]
    fn test_json_depth() {
        assert_eq!(json_depth(&Value::Null), 0);
        assert_eq!(json_depth(&to_json(&Node::operand("a")).unwrap()), 1);
        assert_eq!(json_depth(&to_json(&deep_tree(7)).unwrap()), 7);
    }
}
