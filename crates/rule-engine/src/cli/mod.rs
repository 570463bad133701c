//! CLI 模块
//!
//! - `parse` - 解析规则文本，输出 AST JSON
//! - `combine` - 用 OR 合并多条规则
//! - `evaluate` - 对数据记录评估规则文本或 AST 文件
//!
//! # 使用示例
//!
//! ```bash
//! rule-engine parse "(age > 30) AND (department = Sales)"
//! rule-engine combine "age > 30" "salary > 50000"
//! rule-engine evaluate --rule "age > 30" --data '{"age": 35}' --trace
//! rule-engine evaluate --ast rule.json --data '{"age": 35}'
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::CommandRunner;
