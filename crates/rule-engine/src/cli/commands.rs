//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 规则引擎命令行工具
#[derive(Parser, Debug)]
#[command(name = "rule-engine")]
#[command(version, about = "规则表达式解析、合并与评估工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 解析规则文本，输出 AST JSON
    Parse {
        /// 规则文本，如 "(age > 30) AND (department = Sales)"
        rule: String,
    },

    /// 用 OR 合并多条规则，输出 AST JSON
    Combine {
        /// 规则文本列表
        #[arg(required = true)]
        rules: Vec<String>,
    },

    /// 对数据记录评估规则
    ///
    /// 规则可以是规则文本（--rule）或已保存的 AST JSON 文件（--ast）。
    Evaluate {
        /// 规则文本
        #[arg(short, long, conflicts_with = "ast", required_unless_present = "ast")]
        rule: Option<String>,

        /// AST JSON 文件路径
        #[arg(short, long)]
        ast: Option<PathBuf>,

        /// 数据记录（JSON 对象）
        #[arg(short, long)]
        data: String,

        /// 输出评估追踪
        #[arg(short, long)]
        trace: bool,
    },
}
