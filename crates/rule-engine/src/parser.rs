//! AST 构建器
//!
//! 按 token 顺序从左到右构建二叉树，不做优先级处理：
//!
//! - 每遇到一个操作符，就把当前已构建的整棵树作为新操作符的左子树，
//!   新操作符成为根。因此 `A AND B OR C` 构建为 `OR(AND(A, B), C)`。
//! - 括号是限定子表达式范围的唯一方式，括号内递归独立构建。
//! - 操作数和括号子树挂载到当前操作符的左槽（为空时）或右槽。

use crate::error::{Result, RuleError};
use crate::models::{MAX_DEPTH, Node};
use crate::operators::Operator;
use crate::tokenizer;
use tracing::debug;

/// 解析规则文本为 AST
pub fn parse(text: &str) -> Result<Node> {
    let tokens = tokenizer::tokenize(text)?;

    let root = build_ast(&tokens)?.ok_or_else(|| {
        RuleError::InvalidInput(format!("规则不包含任何表达式: '{}'", text.trim()))
    })?;

    debug!(rule = %root, "规则解析完成");
    Ok(root)
}

/// 从 token 序列构建 AST，序列不产生任何节点时返回 `None`。
///
/// 树的层数或括号嵌套超过 [`MAX_DEPTH`] 时返回 `InvalidInput`。
pub fn build_ast<S: AsRef<str>>(tokens: &[S]) -> Result<Option<Node>> {
    let (partial, _) = parse_expression(tokens, 0, 0)?;
    Ok(partial.root)
}

/// 构建中的子树，记录根节点左右子树的层数
#[derive(Default)]
struct Partial {
    root: Option<Node>,
    left_depth: usize,
    right_depth: usize,
}

impl Partial {
    fn leaf(token: &str) -> Self {
        Self {
            root: Some(Node::operand(token)),
            ..Self::default()
        }
    }

    fn depth(&self) -> usize {
        match &self.root {
            None => 0,
            Some(Node::Operand { .. }) => 1,
            Some(Node::Operator { .. }) => 1 + self.left_depth.max(self.right_depth),
        }
    }

    /// 新操作符成为根，已构建的整棵树成为它的左子树
    fn push_operator(&mut self, op: Operator) -> Result<()> {
        let depth = self.depth();
        self.root = Some(Node::operator(op, self.root.take(), None));
        self.left_depth = depth;
        self.right_depth = 0;
        self.check_depth()
    }

    /// 当前为空时子树成为当前节点，否则挂载到当前节点上
    fn attach(&mut self, child: Partial) -> Result<()> {
        let Some(node) = self.root.as_mut() else {
            *self = child;
            return self.check_depth();
        };

        // 操作数节点丢弃传入的子树
        if node.is_operand() {
            return Ok(());
        }
        if node.left().is_none() {
            self.left_depth = child.depth();
        } else {
            self.right_depth = child.depth();
        }
        node.attach(child.root);

        self.check_depth()
    }

    fn check_depth(&self) -> Result<()> {
        match self.depth() {
            depth if depth > MAX_DEPTH => Err(RuleError::too_deep(depth)),
            _ => Ok(()),
        }
    }
}

/// 从 `start` 开始构建，返回构建结果和停止位置。
///
/// 遇到 `)` 时停止并返回该 `)` 的位置，由调用方跳过它。
/// `nesting` 为当前所处的括号层数。
fn parse_expression<S: AsRef<str>>(
    tokens: &[S],
    start: usize,
    nesting: usize,
) -> Result<(Partial, usize)> {
    if nesting > MAX_DEPTH {
        return Err(RuleError::too_deep(nesting));
    }

    let mut current = Partial::default();
    let mut i = start;

    while i < tokens.len() {
        let token = tokens[i].as_ref();

        match token {
            "(" => {
                let (subtree, next) = parse_expression(tokens, i + 1, nesting + 1)?;
                current.attach(subtree)?;
                i = next;
            }
            ")" => return Ok((current, i)),
            _ => match Operator::from_symbol(token) {
                Some(op) => current.push_operator(op)?,
                None => current.attach(Partial::leaf(token))?,
            },
        }

        i += 1;
    }

    Ok((current, i))
}
