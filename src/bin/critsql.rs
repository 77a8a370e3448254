//! critsql — build SQL clauses from the command line
//!
//! # Usage
//!
//! ```bash
//! # Append a WHERE clause and a limit
//! critsql "SELECT * FROM users" -w "status = active" -w "| age >= 21" --limit 10
//!
//! # Build from a query file
//! critsql --file query.toml
//!
//! # Show how each criterion renders
//! critsql explain "deleted_at IS NULL" "& id IN [1, 2]"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use critsql::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "critsql")]
#[command(version)]
#[command(about = "Build WHERE / GROUP BY / ORDER BY / LIMIT clauses from filter criteria", long_about = None)]
#[command(after_help = "EXAMPLES:
    critsql 'SELECT * FROM users' -w 'status = active' -w '| age >= 21'
    critsql 'SELECT * FROM orders WHERE org_id = 7' --append -w 'total > 100' --order-by 'created_at:desc'
    critsql --file query.toml --format json")]
struct Cli {
    /// Base SQL statement the clauses are appended to
    base: Option<String>,

    /// Criterion expression (repeatable), e.g. "age >= 21" or "| (role = admin"
    #[arg(short = 'w', long = "where")]
    criteria: Vec<String>,

    /// Continue a WHERE clause already present in the base statement
    #[arg(short, long)]
    append: bool,

    /// GROUP BY expression
    #[arg(short, long)]
    group: Option<String>,

    /// ORDER BY expression
    #[arg(short, long)]
    order: Option<String>,

    /// Multi-column ORDER BY, e.g. "name:asc,id:desc"
    #[arg(long)]
    order_by: Option<String>,

    /// LIMIT row count
    #[arg(short, long)]
    limit: Option<u64>,

    /// OFFSET, only used together with --limit
    #[arg(long)]
    offset: Option<u64>,

    /// Query file (.toml or .json) describing the whole statement
    #[arg(short, long, conflicts_with = "base")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse criteria and show how each one renders
    Explain {
        /// Criterion expressions, in clause order
        #[arg(required = true)]
        criteria: Vec<String>,
    },
    /// Show the operator reference
    Operators,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Explain { criteria }) => explain_criteria(criteria),
        Some(Commands::Operators) => {
            show_operators();
            Ok(())
        }
        None => build_query(&cli),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_query(cli: &Cli) -> Result<()> {
    let query = match (&cli.file, &cli.base) {
        (Some(path), _) => QueryFile::load(path)
            .with_context(|| format!("failed to load query file {}", path.display()))?
            .build(),
        (None, Some(base)) => query_from_args(base, cli)?,
        (None, None) => {
            println!("{}", "critsql — filters as data, SQL as text".cyan().bold());
            println!();
            println!("Usage: critsql <BASE_SQL> [-w <CRITERION>]... [OPTIONS]");
            println!();
            println!("Try: critsql --help");
            return Ok(());
        }
    };

    if cli.verbose {
        eprintln!("{}", "Generated SQL:".green().bold());
    }

    match cli.format {
        OutputFormat::Text => println!("{}", query.sql()),
        OutputFormat::Json => {
            let out = serde_json::json!({ "sql": query.sql() });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}

fn query_from_args(base: &str, cli: &Cli) -> Result<Query> {
    let criteria = parse_criteria(cli.criteria.iter().map(String::as_str))
        .context("invalid --where criterion")?;

    let order_by = cli
        .order_by
        .as_deref()
        .map(parse_order)
        .transpose()
        .context("invalid --order-by")?;
    let order_by: Option<Vec<(&str, SortOrder)>> = order_by
        .as_ref()
        .map(|cols| cols.iter().map(|(c, d)| (c.as_str(), *d)).collect());

    let mut query = Query::new(base);
    query
        .filter(Some(&criteria), cli.append)
        .group(cli.group.as_deref())
        .order(cli.order.as_deref())
        .order_multi(order_by.as_deref())
        .limit(cli.limit, cli.offset);

    Ok(query)
}

fn explain_criteria(inputs: &[String]) -> Result<()> {
    println!("{}", "critsql Criterion Explanation".cyan().bold());

    let mut set = CriterionSet::new();
    for (i, input) in inputs.iter().enumerate() {
        let criterion = parse_criterion(input)
            .with_context(|| format!("criterion #{} '{}'", i + 1, input))?;

        println!();
        println!("{} {}", "Input:".dimmed(), input.yellow());
        println!("  {} {}", "Field:".dimmed(), criterion.field.white());
        println!(
            "  {} {}",
            "Operator:".dimmed(),
            criterion.operator.to_string().cyan()
        );
        println!(
            "  {} {} {}",
            "Value:".dimmed(),
            criterion.value.to_string().yellow(),
            format!("({})", value_kind(&criterion.value)).dimmed()
        );
        if i > 0 {
            println!(
                "  {} {}",
                "Conjunction:".dimmed(),
                criterion.conjunction.to_string().cyan()
            );
        }
        if !criterion.left.is_empty() || !criterion.right.is_empty() {
            println!(
                "  {} {} … {}",
                "Decoration:".dimmed(),
                criterion.left,
                criterion.right
            );
        }
        println!(
            "  {} {:?}",
            "Fragment:".dimmed(),
            criterion.to_fragment(i == 0)
        );

        set.push(criterion);
    }

    println!();
    println!("{}", "Clause:".green().bold());
    println!("  {:?}", assemble(&set, false));
    Ok(())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Int(_) => "integer",
        Value::Float(_) => "float",
        Value::Text(_) => "text",
        Value::List(_) => "list",
        Value::DateTime(_) => "date-time",
    }
}

fn show_operators() {
    println!("{}", "critsql Operator Reference".cyan().bold());
    println!();

    println!(
        "{:8} {:8} {}",
        "Token".white().bold(),
        "SQL".white().bold(),
        "Example".white().bold()
    );
    println!("{}", "─".repeat(60).dimmed());

    for (token, op) in Operator::TOKENS {
        let example = match op {
            Operator::In | Operator::NotIn => format!("id {} [1, 2, 3]", token),
            Operator::Is | Operator::IsNot => format!("deleted_at {} NULL", token),
            _ => format!("age {} 21", token),
        };
        let rendered = parse_criterion(&example)
            .map(|c| c.to_fragment(true).trim().to_string())
            .unwrap_or_default();
        println!(
            "{:8} {:8} {} {} {}",
            token.cyan().bold(),
            op.sql_symbol().yellow(),
            example.white(),
            "→".dimmed(),
            rendered.dimmed()
        );
    }

    println!();
    println!("{}", "Unknown tokens fall back to '='.".dimmed());
}
