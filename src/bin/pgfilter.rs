//! pgfilter: translate filters to PostGIS SQL
//!
//! # Usage
//!
//! ```bash
//! # Translate a filter
//! pgfilter translate "name LIKE 'Main%' AND INTERSECTS(geom, POINT(1 2))"
//!
//! # Translate a JSON filter tree with a schema from the config file
//! pgfilter translate --json filter.json --config pgfilter.toml
//!
//! # Show the parsed tree next to the SQL
//! pgfilter explain "DWITHIN(geog, POINT(0 0), 5, km)"
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use pgfilter::prelude::*;
use pgfilter::transpiler::Capabilities;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

#[derive(Parser)]
#[command(name = "pgfilter")]
#[command(version)]
#[command(about = "Translate filter expressions into PostGIS SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    pgfilter translate \"population > 1000 AND name ILIKE 'san%'\"
    pgfilter translate \"BBOX(geom, 0, 0, 10, 10)\" --loose-bbox false
    pgfilter explain \"strConcat(a, b) = 'xy'\" --encode-functions")]
struct Cli {
    /// Config file (defaults to ./pgfilter.toml, then the user config dir)
    #[arg(short, long, global = true, env = "PGFILTER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the loose bounding box setting
    #[arg(long, global = true)]
    loose_bbox: Option<bool>,

    /// Translate string and math functions
    #[arg(long, global = true)]
    encode_functions: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Sql,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a filter to SQL
    Translate {
        /// Filter text
        filter: Option<String>,

        /// Read a JSON filter tree from a file instead
        #[arg(long, conflicts_with = "filter")]
        json: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "sql")]
        format: OutputFormat,
    },
    /// Show the parsed filter tree and its SQL
    Explain {
        /// Filter text
        filter: String,
    },
    /// List the filter kinds the dialect can translate
    Capabilities,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = log_filter(EnvFilter::try_from_default_env().ok(), verbose);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` when set, `pgfilter=warn` otherwise; `--verbose` raises the
/// crate to debug on top of either.
fn log_filter(env: Option<EnvFilter>, verbose: bool) -> EnvFilter {
    let filter = env.unwrap_or_else(|| EnvFilter::new("pgfilter=warn"));
    if !verbose {
        return filter;
    }
    match VERBOSE_DIRECTIVE.parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

const VERBOSE_DIRECTIVE: &str = "pgfilter=debug";

fn run(cli: &Cli) -> Result<()> {
    let config = TranslatorConfig::load(cli.config.as_deref()).context("loading config")?;

    let mut dialect = config.dialect();
    if let Some(loose) = cli.loose_bbox {
        dialect.set_loose_bbox_enabled(loose);
    }
    if cli.encode_functions {
        dialect.set_function_encoding_enabled(true);
    }

    let mut translator = FilterToSql::new(&dialect);
    if let Some(feature_type) = &config.feature_type {
        translator = translator.with_schema(feature_type);
    }

    match &cli.command {
        Commands::Translate {
            filter,
            json,
            format,
        } => {
            let filter = read_filter(filter.as_deref(), json.as_ref())?;
            let sql = translator.encode(&filter)?;
            match format {
                OutputFormat::Sql => println!("{}", sql),
                OutputFormat::Json => {
                    let out = serde_json::json!({ "filter": filter, "sql": sql });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
            }
        }
        Commands::Explain { filter } => explain(filter, &translator)?,
        Commands::Capabilities => show_capabilities(&dialect.capabilities()),
    }
    Ok(())
}

fn read_filter(text: Option<&str>, json: Option<&PathBuf>) -> Result<Filter> {
    match (text, json) {
        (Some(text), _) => Ok(pgfilter::parse(text)?),
        (None, Some(path)) => {
            let content =
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        }
        (None, None) => bail!("give a filter or --json <file>"),
    }
}

fn explain(text: &str, translator: &FilterToSql<'_>) -> Result<()> {
    println!("{} {}", "Filter:".dimmed(), text.yellow());
    println!();

    let filter = pgfilter::parse(text)?;
    println!("{}", "Parsed Structure:".green().bold());
    print_tree(&filter, 1);

    println!();
    println!("{}", "Generated SQL:".green().bold());
    match translator.encode(&filter) {
        Ok(sql) => println!("  {}", sql.white()),
        Err(e) => println!("  {} {}", "✗".red(), e),
    }
    Ok(())
}

fn print_tree(filter: &Filter, depth: usize) {
    let indent = "  ".repeat(depth);
    match filter {
        Filter::Include | Filter::Exclude => {
            println!("{}{}", indent, format!("{:?}", filter).to_uppercase().cyan())
        }
        Filter::And { filters } | Filter::Or { filters } => {
            let name = if matches!(filter, Filter::And { .. }) { "AND" } else { "OR" };
            println!("{}{}", indent, name.cyan());
            for f in filters {
                print_tree(f, depth + 1);
            }
        }
        Filter::Not { filter } => {
            println!("{}{}", indent, "NOT".cyan());
            print_tree(filter, depth + 1);
        }
        Filter::Compare { op, left, right } => println!(
            "{}{} {} {}",
            indent,
            left.to_string().white(),
            op.as_sql().cyan(),
            right.to_string().yellow()
        ),
        Filter::Between { expr, lower, upper } => println!(
            "{}{} {} {} {} {}",
            indent,
            expr.to_string().white(),
            "BETWEEN".cyan(),
            lower.to_string().yellow(),
            "AND".cyan(),
            upper.to_string().yellow()
        ),
        Filter::IsNull { expr } => {
            println!("{}{} {}", indent, expr.to_string().white(), "IS NULL".cyan())
        }
        Filter::Like(like) => println!(
            "{}{} {} '{}'",
            indent,
            like.expr.to_string().white(),
            if like.match_case { "LIKE" } else { "ILIKE" }.cyan(),
            like.pattern.yellow()
        ),
        Filter::Spatial(s) => println!(
            "{}{}({}, {})",
            indent,
            s.op.to_string().cyan(),
            s.left.to_string().white(),
            s.right.to_string().yellow()
        ),
        Filter::Distance(d) => {
            let units = d
                .units
                .map(|u| format!(" {:?}", u).to_lowercase())
                .unwrap_or_default();
            println!(
                "{}{}({}, {}, {}{})",
                indent,
                d.op.to_string().cyan(),
                d.left.to_string().white(),
                d.right.to_string().yellow(),
                d.distance,
                units
            )
        }
    }
}

fn show_capabilities(capabilities: &Capabilities) {
    println!("{}", "Supported filters".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for capability in capabilities.iter() {
        println!("  • {}", capability.to_string().white());
    }
    println!();
    println!("{} kind(s)", capabilities.len().to_string().cyan());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_env_filter() {
        let filter = log_filter(Some(EnvFilter::new("info,pgfilter=error")), true);
        assert!(filter.to_string().contains("pgfilter=debug"), "{filter}");
    }

    #[test]
    fn test_env_filter_kept_without_verbose() {
        let filter = log_filter(Some(EnvFilter::new("pgfilter=error")), false).to_string();
        assert!(filter.contains("pgfilter=error"), "{filter}");
        assert!(!filter.contains("debug"), "{filter}");
    }

    #[test]
    fn test_default_filter() {
        assert!(log_filter(None, false).to_string().contains("pgfilter=warn"));
        assert!(log_filter(None, true).to_string().contains("pgfilter=debug"));
    }
}
