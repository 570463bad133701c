//! 规则文本分词
//!
//! 按括号、方括号、整词 `AND`/`OR`、比较符号和空白切分规则文本。
//! 分隔符（空白除外）本身也作为 token 保留。

use crate::error::{Result, RuleError};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

// 备选项按从左到右优先匹配，`>=`/`<=` 必须排在 `>`/`<` 之前。
// 关键字边界只把 ASCII 字母、数字和下划线视为单词字符。
static DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[()\[\]]|(?-u:\b)AND(?-u:\b)|(?-u:\b)OR(?-u:\b)|>=|<=|>|<|=|\s+")
        .expect("分词正则表达式无效")
});

/// 将规则文本切分为 token 序列
pub fn tokenize(text: &str) -> Result<Vec<String>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RuleError::InvalidInput("规则文本不能为空".to_string()));
    }

    let mut tokens = Vec::new();
    let mut last = 0;

    for m in DELIMITER.find_iter(text) {
        push_fragment(&mut tokens, &text[last..m.start()]);
        push_fragment(&mut tokens, m.as_str());
        last = m.end();
    }
    push_fragment(&mut tokens, &text[last..]);

    debug!(token_count = tokens.len(), "规则文本分词完成");
    Ok(tokens)
}

fn push_fragment(tokens: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        tokens.push(fragment.to_string());
    }
}
