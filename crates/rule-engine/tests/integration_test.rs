//! 规则引擎集成测试
//!
//! 测试完整的规则解析、合并、存储往返与评估工作流。

use rule_engine::{
    EvaluationContext, MAX_DEPTH, Node, Operator, Rule, RuleEngine, RuleError, combine,
    evaluate, evaluate_tree, from_json, from_json_str, parse, to_json,
};
use serde_json::json;

/// 创建测试上下文：一名销售部门员工
fn create_employee_context() -> EvaluationContext {
    EvaluationContext::from_value(json!({
        "age": 35,
        "department": "Sales",
        "salary": 60000,
        "experience": 3,
        "is_manager": false
    }))
    .unwrap()
}

fn leaf(token: &str) -> Node {
    Node::operand(token)
}

// ==================== 完整工作流测试 ====================

#[test]
fn test_full_workflow_parse_store_evaluate() {
    let engine = RuleEngine::new();

    // 1. 创建规则
    let rule = Rule::new(
        "sales_or_marketing",
        "((age > 30) AND (department = Sales)) OR ((age < 25) AND (department = Marketing))",
    )
    .unwrap()
    .with_description("资深销售或年轻市场人员");

    // 2. 存储形式往返
    let stored = serde_json::to_value(&rule).unwrap();
    let restored: Rule = serde_json::from_value(stored).unwrap();
    assert_eq!(restored.ast, rule.ast);

    // 3. 评估
    assert!(engine.evaluate(&restored.ast, &create_employee_context()).unwrap());

    let marketing = create_employee_context()
        .with_field("age", 22_i64)
        .with_field("department", "Marketing");
    assert!(engine.evaluate(&restored.ast, &marketing).unwrap());

    let engineering = create_employee_context().with_field("department", "Engineering");
    assert!(!engine.evaluate(&restored.ast, &engineering).unwrap());
}

#[test]
fn test_evaluate_stored_ast_json() {
    let engine = RuleEngine::new();
    let ast = engine
        .create_rule("((age > 30) AND (department = Marketing)) OR (salary > 20000)")
        .unwrap();
    let stored = to_json(&ast).unwrap();

    assert!(engine
        .evaluate_rule(&stored, &json!({ "age": 20, "department": "Sales", "salary": 30000 }))
        .unwrap());
    assert!(!engine
        .evaluate_rule(&stored, &json!({ "age": 20, "department": "Sales", "salary": 10000 }))
        .unwrap());
}

// ==================== 树结构测试 ====================

#[test]
fn test_unparenthesized_chain_shape() {
    assert_eq!(
        parse("A AND B OR C").unwrap(),
        Node::binary(
            Operator::Or,
            Node::binary(Operator::And, leaf("A"), leaf("B")),
            leaf("C")
        )
    );
}

#[test]
fn test_single_rule_combine_equals_parse() {
    let rule = "(age > 30) AND (department = Sales)";
    assert_eq!(combine(&[rule]).unwrap(), parse(rule).unwrap());
}

#[test]
fn test_combine_is_left_deep() {
    let (a, b, c) = ("age > 30", "department = Sales", "salary >= 50000");
    assert_eq!(
        combine(&[a, b, c]).unwrap(),
        Node::binary(
            Operator::Or,
            Node::binary(Operator::Or, parse(a).unwrap(), parse(b).unwrap()),
            parse(c).unwrap()
        )
    );
}

#[test]
fn test_combine_empty() {
    let rules: Vec<String> = Vec::new();
    assert!(matches!(combine(&rules), Err(RuleError::NoRulesProvided)));
}

#[test]
fn test_combined_rules_evaluate_as_any() {
    let combined = combine(&["age > 60", "department = Sales", "salary > 1000000"]).unwrap();
    assert!(evaluate(&combined, &create_employee_context()).unwrap());

    let combined = combine(&["age > 60", "department = Legal"]).unwrap();
    assert!(!evaluate(&combined, &create_employee_context()).unwrap());
}

// ==================== 比较语义测试 ====================

#[test]
fn test_equality_with_numeric_record_value() {
    // 字面量 "30" 提升为数字 30
    let rule = parse("age = 30").unwrap();
    let ctx = EvaluationContext::from_value(json!({ "age": 30 })).unwrap();
    assert!(evaluate(&rule, &ctx).unwrap());
}

#[test]
fn test_equality_with_string_record_value() {
    // 记录中的字符串 "30" 与数字 30 类型不同
    let rule = parse("age = 30").unwrap();
    let ctx = EvaluationContext::from_value(json!({ "age": "30" })).unwrap();
    assert!(!evaluate(&rule, &ctx).unwrap());
}

#[test]
fn test_greater_than() {
    let rule = parse("age > 18").unwrap();
    let adult = EvaluationContext::from_value(json!({ "age": 25 })).unwrap();
    let child = EvaluationContext::from_value(json!({ "age": 10 })).unwrap();

    assert!(evaluate(&rule, &adult).unwrap());
    assert!(!evaluate(&rule, &child).unwrap());
}

#[test]
fn test_boundary_comparisons() {
    let ctx = EvaluationContext::from_value(json!({ "age": 18 })).unwrap();
    assert!(evaluate(&parse("age >= 18").unwrap(), &ctx).unwrap());
    assert!(evaluate(&parse("age <= 18").unwrap(), &ctx).unwrap());
    assert!(!evaluate(&parse("age > 18").unwrap(), &ctx).unwrap());
    assert!(!evaluate(&parse("age < 18").unwrap(), &ctx).unwrap());
}

#[test]
fn test_string_fields() {
    let ctx = create_employee_context();
    assert!(evaluate(&parse("department = Sales").unwrap(), &ctx).unwrap());
    assert!(evaluate(&parse("department < Engineering").unwrap(), &ctx).is_ok_and(|r| !r));
    assert!(evaluate(&parse("department > Engineering").unwrap(), &ctx).unwrap());
}

#[test]
fn test_boolean_field() {
    let ctx = create_employee_context();
    assert!(!evaluate(&parse("is_manager").unwrap(), &ctx).unwrap());
    // 字面量 false 不是布尔值，而是字符串 "false"
    assert!(!evaluate(&parse("is_manager = false").unwrap(), &ctx).unwrap());
}

// ==================== 异常与降级测试 ====================

#[test]
fn test_unknown_operator() {
    let node = Node::operator("!=", Some(leaf("age")), Some(leaf("30")));
    let err = evaluate(&node, &create_employee_context()).unwrap_err();
    assert!(matches!(err, RuleError::UnknownOperator(_)));
}

#[test]
fn test_unknown_operator_from_json() {
    let stored = json!({
        "type": "operator",
        "value": "!=",
        "left": { "type": "operand", "value": "age", "left": null, "right": null },
        "right": { "type": "operand", "value": "30", "left": null, "right": null }
    });

    let err = RuleEngine::new()
        .evaluate_rule(&stored, &json!({ "age": 35 }))
        .unwrap_err();
    assert!(err.to_string().contains("!="));
}

#[test]
fn test_invalid_input() {
    assert!(matches!(parse(""), Err(RuleError::InvalidInput(_))));
    assert!(matches!(parse(" \t "), Err(RuleError::InvalidInput(_))));
}

#[test]
fn test_null_tree_is_false() {
    let tree = from_json(&serde_json::Value::Null).unwrap();
    assert!(tree.is_none());
    assert!(!evaluate_tree(tree.as_ref(), &create_employee_context()).unwrap());
}

#[test]
fn test_partial_tree_is_false() {
    let stored = json!({
        "type": "operator",
        "value": "AND",
        "left": {
            "type": "operator",
            "value": ">",
            "left": { "type": "operand", "value": "age" },
            "right": { "type": "operand", "value": "30" }
        },
        "right": null
    });

    let tree = from_json(&stored).unwrap();
    assert!(!evaluate_tree(tree.as_ref(), &create_employee_context()).unwrap());
}

// ==================== 往返测试 ====================

#[test]
fn test_round_trip_preserves_evaluation() {
    let rules = [
        "age > 30",
        "A AND B OR C",
        "((age > 30) AND (department = Sales)) OR (salary < 10)",
        "(experience >= 3) AND (is_manager = x)",
        "age >",
    ];
    let ctx = create_employee_context();

    for rule in rules {
        let tree = parse(rule).unwrap();
        let restored = from_json(&to_json(&tree).unwrap()).unwrap().unwrap();

        assert_eq!(restored, tree, "规则 '{}' 往返后结构不一致", rule);
        assert_eq!(
            evaluate(&restored, &ctx).unwrap(),
            evaluate(&tree, &ctx).unwrap(),
            "规则 '{}' 往返后评估结果不一致",
            rule
        );
    }
}

#[test]
fn test_longest_chain_survives_storage() {
    let rule = format!("(age > 30){}", " OR (age > 30)".repeat(MAX_DEPTH / 2 - 1));
    let tree = parse(&rule).unwrap();
    assert!(tree.depth() <= MAX_DEPTH);

    let text = serde_json::to_string(&to_json(&tree).unwrap()).unwrap();
    let restored = from_json_str(&text).unwrap().unwrap();
    assert_eq!(restored, tree);
    assert!(evaluate(&restored, &create_employee_context()).unwrap());
}

#[test]
fn test_deep_rules_fail_cleanly() {
    let chain = format!("a{}", " AND a".repeat(200_000));
    assert!(matches!(parse(&chain), Err(RuleError::InvalidInput(_))));

    let nested = format!("{}a", "(".repeat(200_000));
    assert!(matches!(parse(&nested), Err(RuleError::InvalidInput(_))));

    let rules: Vec<String> = (0..200).map(|_| "age > 30".to_string()).collect();
    assert!(matches!(combine(&rules), Err(RuleError::InvalidInput(_))));
}

// ==================== 并发测试 ====================

#[test]
fn test_parallel_evaluation() {
    let rule = parse("(age > 30) AND (department = Sales)").unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8_i64)
            .map(|i| {
                let rule = &rule;
                s.spawn(move || {
                    let ctx = create_employee_context().with_field("age", 25 + i * 2);
                    evaluate(rule, &ctx).unwrap()
                })
            })
            .collect();

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        // age 依次为 25..=39，大于 30 的是 i >= 3
        assert_eq!(
            results,
            vec![false, false, false, true, true, true, true, true]
        );
    });
}
