//! unfold CLI: compile traversals through a strategy pipeline, inspect the
//! lowering, and run the result with tagging operators.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::{fmt, EnvFilter};

use unfold_core::config::PlannerConfig;
use unfold_core::dag::PlanGraph;
use unfold_core::step::LogicalStep;
use unfold_exec::{guard_request, Executor};
use unfold_operators::builtin::PathTag;
use unfold_operators::{Operator, Registry};
use unfold_planner::{compile, parse_yaml_pipeline, parse_yaml_traversal, LoweringValidator, StrategyPipeline};

#[derive(Parser)]
#[command(name = "unfold")]
#[command(about = "Lower graph traversals through placeholder-based rewrite strategies", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a traversal and check that lowering left no placeholders
    Validate {
        /// Path to the traversal YAML file
        #[arg(short, long)]
        traversal: PathBuf,

        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Show each rewrite step and the lowered plan (EXPLAIN)
    Explain {
        /// Path to the traversal YAML file
        #[arg(short, long)]
        traversal: PathBuf,

        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Compile and execute with path-tagging operators
    Run {
        /// Path to the traversal YAML file
        #[arg(short, long)]
        traversal: PathBuf,

        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// JSON array of input traversers (defaults to a single `{}`)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            traversal,
            pipeline,
        } => validate(&traversal, &pipeline),
        Commands::Explain {
            traversal,
            pipeline,
        } => load(&traversal, &pipeline).and_then(|(steps, pipeline)| {
            print!("{}", explain(steps, &pipeline)?);
            Ok(())
        }),
        Commands::Run {
            traversal,
            pipeline,
            input,
        } => run(&traversal, &pipeline, input.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn load(traversal: &Path, pipeline: &Path) -> CliResult<(Vec<LogicalStep>, StrategyPipeline)> {
    let steps = parse_yaml_traversal(&fs::read_to_string(traversal)?)?;
    let pipeline = parse_yaml_pipeline(&fs::read_to_string(pipeline)?, PlannerConfig::from_env())?;
    Ok((steps, pipeline))
}

fn validate(traversal: &Path, pipeline: &Path) -> CliResult<()> {
    let (steps, pipeline) = load(traversal, pipeline)?;
    let plan = compile(steps, &pipeline)?;
    println!("✓ Plan lowered: {} node(s), fingerprint {}", plan.len(), plan.fingerprint()?.short());
    Ok(())
}

fn explain(steps: Vec<LogicalStep>, pipeline: &StrategyPipeline) -> CliResult<String> {
    let mut out = String::new();
    let logical = PlanGraph::from_steps(steps);

    writeln!(out, "Traversal Lowering Plan")?;
    writeln!(out, "=======================")?;
    writeln!(out)?;
    writeln!(out, "Logical: {logical}")?;
    writeln!(out)?;

    let outcome = pipeline.run(logical)?;
    writeln!(out, "Strategies:")?;
    for (i, t) in outcome.traces.iter().enumerate() {
        let mark = if t.changed { "*" } else { " " };
        writeln!(
            out,
            "  {}. {} [{} pass {}] {}",
            i + 1,
            mark,
            t.phase,
            t.pass,
            t.strategy
        )?;
        if t.changed {
            writeln!(out, "       → {}", t.after)?;
        }
    }
    writeln!(out)?;

    match LoweringValidator::validate(outcome.graph) {
        Ok(plan) => {
            writeln!(out, "Physical: {plan}")?;
            writeln!(out, "Fingerprint: {}", plan.fingerprint()?)?;
        }
        Err(e) => {
            writeln!(out, "Lowering incomplete ({} unresolved):", e.unresolved.len())?;
            for u in &e.unresolved {
                writeln!(out, "  - `{}` at {}", u.kind, u.position)?;
            }
        }
    }
    Ok(out)
}

fn run(traversal: &Path, pipeline: &Path, input: Option<&Path>) -> CliResult<()> {
    let (steps, pipeline) = load(traversal, pipeline)?;
    let plan = compile(steps, &pipeline)?;
    let batch = match input {
        Some(path) => parse_input(&fs::read_to_string(path)?)?,
        None => vec![json!({})],
    };

    let executor = Executor::new(tagging_registry());
    let output = guard_request(|| executor.run(&plan, batch))?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Every key resolves to a `PathTag` named after it.
fn tagging_registry() -> Registry {
    Registry::new().with_fallback(|cfg| {
        let key = cfg.get("key").and_then(Value::as_str).unwrap_or("unknown");
        Ok(Box::new(PathTag::named(key)) as Box<dyn Operator>)
    })
}

fn parse_input(src: &str) -> CliResult<Vec<Value>> {
    match serde_json::from_str::<Value>(src)? {
        Value::Array(items) => Ok(items),
        other => Err(format!("input must be a JSON array of traversers, got {other}").into()),
    }
}
