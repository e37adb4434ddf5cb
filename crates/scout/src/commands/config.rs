//! Config command - configuration management.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use serde_json::json;

use scout_config::ScoutConfig;

use super::{Context, print_json};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration (secrets masked)
    Show,

    /// Show which config files are searched and which were loaded
    Path,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = &ctx.loaded;
    let config = masked(&loaded.config);

    if ctx.json_output {
        return print_json(&json!({
            "sources": loaded.loaded_from(),
            "backend": ctx.backend.to_string(),
            "config": config,
            "warnings": loaded.warnings,
        }));
    }

    let dim = Style::new().dim();
    println!("{}\n", style("# Scout Configuration").bold());

    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }

    let redis = config.redis();
    let store = config.store();
    let service = config.resume_service();
    println!("Store:");
    println!("  backend: {}", ctx.backend);
    println!("  redis: {}:{}/{}", redis.host, redis.port, redis.db);
    println!("  max_size: {}  ttl: {}s", store.max_size, store.ttl_seconds);
    println!("  keys: {}:<session>:{}", store.key_prefix, store.list_name);
    println!();
    println!("Resume service:");
    println!("  {} (timeout {}s)", service.base_url, service.timeout_secs);
    println!();

    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for w in &loaded.warnings {
            println!("  ⚠ {}", w);
        }
        println!();
    }

    if ctx.verbose {
        println!("{}", dim.apply_to("---\nResolved config:\n"));
        println!("{}", config.to_toml()?);
    }

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    if ctx.json_output {
        let sources: Vec<_> = ctx
            .loaded
            .sources
            .iter()
            .map(|s| json!({"path": s.path, "loaded": s.loaded}))
            .collect();
        return print_json(&sources);
    }

    println!("Config file search order (later overrides earlier):\n");
    for source in &ctx.loaded.sources {
        let status = if source.loaded {
            "✓ loaded"
        } else {
            "· not found"
        };
        println!("  {} {}", status, source.path.display());
    }
    Ok(())
}

/// Copy of `config` with secrets replaced.
fn masked(config: &ScoutConfig) -> ScoutConfig {
    let mut config = config.clone();
    if let Some(redis) = config.redis.as_mut()
        && redis.password.is_some()
    {
        redis.password = Some("***".to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_config::RedisConfig;

    #[test]
    fn test_masked_hides_password() {
        let config = ScoutConfig {
            redis: Some(RedisConfig {
                password: Some("hunter2".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let masked = masked(&config);
        assert_eq!(masked.redis().password.as_deref(), Some("***"));
        assert!(!masked.to_toml().unwrap().contains("hunter2"));
        assert_eq!(config.redis().password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_masked_leaves_missing_password() {
        let masked = masked(&ScoutConfig::default());
        assert!(masked.redis.is_none());
    }
}
