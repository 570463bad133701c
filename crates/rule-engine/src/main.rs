//! 规则引擎命令行入口

use anyhow::Result;
use clap::Parser;
use rule_engine::cli::{Cli, CommandRunner, Commands};
use rules_shared::config::AppConfig;
use rules_shared::observability;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 统一加载配置：从 config/{service_name}.toml 加载
    let mut config = AppConfig::load("rule-engine").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }
    observability::init(&config.observability)?;

    let runner = CommandRunner::new(config.engine.trace_enabled);

    let output = match cli.command {
        Commands::Parse { rule } => runner.run_parse(&rule)?,
        Commands::Combine { rules } => runner.run_combine(&rules)?,
        Commands::Evaluate {
            rule,
            ast,
            data,
            trace,
        } => runner.run_evaluate(rule.as_deref(), ast.as_deref(), &data, trace)?,
    };

    println!("{}", output);
    Ok(())
}
