//! Configuration loader for the quick-look plotter.
//!
//! Loads and validates a single YAML file. Missing keys take the deployment
//! defaults from [`QuicklookConfig::default`].
//!
//! Supports environment variable substitution using ${VAR} syntax.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::QuicklookConfig;
use crate::naming::check_template;

const MINUTES_PER_DAY: u32 = 1440;

/// Load, expand and validate a configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<QuicklookConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config from {:?}", path.as_ref()))?;

    let config = parse_config(&content)
        .with_context(|| format!("Invalid config in {:?}", path.as_ref()))?;

    debug!(path = ?path.as_ref(), modes = ?config.modes, "Loaded configuration");
    Ok(config)
}

/// Expand and validate configuration YAML held in memory.
pub fn parse_config(content: &str) -> Result<QuicklookConfig> {
    let expanded = expand_env_vars(content)?;

    // An empty document deserialises to unit, not to an empty mapping.
    let config: QuicklookConfig = if expanded.trim().is_empty() {
        QuicklookConfig::default()
    } else {
        serde_yaml::from_str(&expanded).with_context(|| "Failed to parse config YAML")?
    };

    validate_config(&config)?;
    Ok(config)
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand environment variables in YAML content
/// Supports ${VAR} and ${VAR:-default} syntax
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            let mut brace_count = 1;

            while brace_count > 0 {
                match chars.next() {
                    Some('{') => {
                        brace_count += 1;
                        var_expr.push('{');
                    }
                    Some('}') => {
                        brace_count -= 1;
                        if brace_count > 0 {
                            var_expr.push('}');
                        }
                    }
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Check a configuration before any file is read.
pub fn validate_config(config: &QuicklookConfig) -> Result<()> {
    anyhow::ensure!(!config.instrument.is_empty(), "instrument cannot be empty");
    anyhow::ensure!(!config.output_prefix.is_empty(), "output_prefix cannot be empty");
    anyhow::ensure!(!config.formats.is_empty(), "at least one output format is required");

    anyhow::ensure!(
        config.windows.iter().all(|&w| w >= 1),
        "windows must be at least one day, got {:?}",
        config.windows
    );
    anyhow::ensure!(
        config.fallback_cadence_minutes > 0
            && MINUTES_PER_DAY % config.fallback_cadence_minutes == 0,
        "fallback_cadence_minutes must divide a day, got {}",
        config.fallback_cadence_minutes
    );
    for mode in config.modes.iter().chain(&config.day.modes) {
        anyhow::ensure!(
            !mode.is_empty() && !mode.contains('/'),
            "Invalid mode: {:?}",
            mode
        );
    }

    for template in [
        &config.source_template,
        &config.day.source_template,
        &config.day.output_subdir,
    ] {
        check_template(template).with_context(|| format!("Invalid template {:?}", template))?;
    }

    anyhow::ensure!(
        config.figure.width >= 600 && config.figure.panel_height >= 300,
        "figure must be at least 600x300 pixels, got {}x{}",
        config.figure.width,
        config.figure.panel_height
    );

    let wind = &config.wind;
    anyhow::ensure!(wind.arrow_interval >= 1, "wind.arrow_interval must be at least 1");
    anyhow::ensure!(wind.arrow_length > 0.0, "wind.arrow_length must be positive");
    anyhow::ensure!(wind.arrow_scale > 0.0, "wind.arrow_scale must be positive");
    wind.style.validate().context("Invalid wind style")?;
    config.day.wind_style.validate().context("Invalid day wind style")?;

    for var in config
        .variables
        .iter()
        .chain(&config.multipanel)
        .chain(&config.day.variables)
    {
        anyhow::ensure!(!var.name.is_empty(), "variable name cannot be empty");
        var.style
            .validate()
            .with_context(|| format!("Invalid style for {}", var.name))?;
    }

    Ok(())
}
