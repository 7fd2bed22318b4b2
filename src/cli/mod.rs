// CLI command definitions for the fixtures binary

use clap::{Parser, Subcommand, ValueEnum};

/// Fixtures - deterministic control-flow targets for path exploration
///
/// Runs the fixture suite by name, and sweeps fixtures over fixed input
/// domains to tabulate which outcomes are reachable.
#[derive(Parser, Debug, Clone)]
#[command(name = "fixtures")]
#[command(author, version, about)]
#[command(long_about = "Fixtures is a suite of small functions with precisely specified
control flow.

Each fixture exists to be explored by a path-exploration or symbolic-execution
engine: branches, wraparound arithmetic, switch dispatch, recursion, aliasing
through a mutable node graph, nullable returns.

This binary runs single fixtures and sweeps them over concrete input domains.
It does not solve constraints.")]
pub struct Cli {
    /// Output format
    #[arg(
        global = true,
        long,
        value_enum,
        env = "FIXTURES_OUTPUT",
        default_value_t = OutputFormat::Human
    )]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// Compact JSON for programmatic consumption
    Json,
    /// Formatted JSON with indentation
    Pretty,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List every fixture with its parameters and documented outcomes
    List(ListArgs),

    /// Run one fixture with the given arguments
    Run(RunArgs),

    /// Run fixtures over their input domains and tabulate outcomes
    Sweep(SweepArgs),
}

#[derive(Parser, Debug, Clone, Copy)]
pub struct ListArgs {}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Fixture name, e.g. switch-dispatch
    pub fixture: String,

    /// Arguments: true/false, integers, or node indices / null
    #[arg(allow_negative_numbers = true)]
    pub args: Vec<String>,

    /// JSON node graph for fixtures that take nodes
    #[arg(long)]
    pub graph: Option<String>,

    /// Print the node graph after the call in Graphviz DOT format
    #[arg(long)]
    pub dot: bool,

    /// Run fixtures that never return (the process will abort)
    #[arg(long)]
    pub allow_divergence: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SweepArgs {
    /// Sweep only this fixture
    pub fixture: Option<String>,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub report: Option<String>,
}

// ============================================================================
// Command Handlers
// ============================================================================

pub mod cmds {
    use super::*;
    use crate::catalog::{self, CatalogError, Fixture, Invocation};
    use crate::coverage::{self, OutcomeTable, SweepReport};
    use crate::node::NodeGraph;
    use crate::output::{self, JsonError, JsonResponse};
    use anyhow::{Context, Result};
    use serde::Serialize;
    use std::path::Path;

    fn emit<T: Serialize>(cli: &Cli, data: T) {
        let response = JsonResponse::new(data);
        match cli.output {
            OutputFormat::Pretty => println!("{}", response.to_pretty_json()),
            _ => println!("{}", response.to_json()),
        }
    }

    fn fail(cli: &Cli, err: JsonError, exit_code: i32) -> ! {
        match cli.output {
            OutputFormat::Human => {
                output::error(&err.message);
                if let Some(hint) = &err.remediation {
                    output::info(&format!("Hint: {}", hint));
                }
            }
            _ => emit(cli, err),
        }
        std::process::exit(exit_code);
    }

    fn lookup(cli: &Cli, name: &str) -> Fixture {
        match Fixture::parse(name) {
            Ok(f) => f,
            Err(err) => {
                let (json, code) = classify(&err);
                fail(cli, json, code);
            }
        }
    }

    /// Map a rejected request to its JSON error and exit code
    pub(crate) fn classify(err: &CatalogError) -> (JsonError, i32) {
        let message = err.to_string();
        match err {
            CatalogError::UnknownFixture(name) => {
                (JsonError::fixture_not_found(name), output::EXIT_NOT_FOUND)
            }
            CatalogError::Arity { .. } | CatalogError::InvalidArgument { .. } => (
                JsonError::new("InvalidInput", &message, output::E_INVALID_INPUT)
                    .with_remediation(output::R_HINT_LIST_FIXTURES),
                output::EXIT_USAGE,
            ),
            CatalogError::UnknownNode { .. } => (
                JsonError::new("NodeNotFound", &message, output::E_NODE_NOT_FOUND)
                    .with_remediation(output::R_HINT_GRAPH),
                output::EXIT_NOT_FOUND,
            ),
            CatalogError::InvalidGraph(_) => (
                JsonError::new("InvalidGraph", &message, output::E_INVALID_INPUT)
                    .with_remediation(output::R_HINT_GRAPH),
                output::EXIT_USAGE,
            ),
            CatalogError::Divergent(_) => (
                JsonError::new("Divergent", &message, output::E_DIVERGENT)
                    .with_remediation(output::R_HINT_ALLOW_DIVERGENCE),
                output::EXIT_USAGE,
            ),
        }
    }

    fn load_graph(cli: &Cli, path: &str) -> Result<NodeGraph> {
        if !Path::new(path).exists() {
            fail(cli, JsonError::file_not_found(path), output::EXIT_FILE_NOT_FOUND);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read node graph from {}", path))?;
        let graph = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse node graph in {}", path))?;
        Ok(graph)
    }

    pub fn list(_args: ListArgs, cli: &Cli) -> Result<()> {
        let infos: Vec<_> = Fixture::ALL.into_iter().map(Fixture::info).collect();

        match cli.output {
            OutputFormat::Human => {
                output::header(&format!("{} fixtures", infos.len()));
                for info in &infos {
                    let params = info
                        .params
                        .iter()
                        .map(|p| format!("{}: {}", p.name, p.kind.as_str()))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let mut line = format!("{}({}) -> {}", info.name, params, info.returns);
                    if !info.outcomes.is_empty() {
                        line.push_str(&format!("  outcomes: {}", info.outcomes.join(" ")));
                    }
                    if info.divergent {
                        line.push_str("  [divergent]");
                    }
                    println!("  {}", line);
                }
            }
            _ => emit(cli, infos),
        }
        Ok(())
    }

    pub fn run(args: RunArgs, cli: &Cli) -> Result<()> {
        let fixture = lookup(cli, &args.fixture);
        let graph = match &args.graph {
            Some(path) => Some(load_graph(cli, path)?),
            None => None,
        };

        if let Some(g) = &graph {
            // an invalid graph is reported by invoke below
            if fixture.info().uses_graph && matches!(g.has_cycle(), Ok(true)) {
                output::warn(&format!(
                    "node graph is cyclic; {} may not terminate on it",
                    fixture
                ));
            }
        }
        if args.allow_divergence && fixture.info().divergent {
            output::warn(&format!("{} never returns; expect a stack overflow", fixture));
        }
        let result = if args.allow_divergence {
            catalog::invoke_allowing_divergence(fixture, &args.args, graph)
        } else {
            catalog::invoke(fixture, &args.args, graph)
        };

        let invocation = match result {
            Ok(inv) => inv,
            Err(err) => {
                let (json, code) = classify(&err);
                fail(cli, json, code);
            }
        };

        match cli.output {
            OutputFormat::Human => print_invocation(&invocation, args.dot)?,
            _ => emit(cli, &invocation),
        }

        if invocation.outcome.is_fault() {
            std::process::exit(output::EXIT_VALIDATION);
        }
        Ok(())
    }

    fn print_invocation(inv: &Invocation, dot: bool) -> Result<()> {
        let call = format!("{}({})", inv.fixture, inv.args.join(", "));
        match &inv.outcome {
            catalog::Outcome::Returned(value) => println!("{} = {}", call, value),
            catalog::Outcome::Fault(err) => println!("{} faulted: {}", call, err),
        }

        if let Some(graph) = &inv.graph {
            if dot {
                print!("{}", graph.to_dot()?);
                return Ok(());
            }
            for (id, node) in graph.ids().zip(graph.nodes()) {
                let link = node
                    .link
                    .map_or_else(|| "null".to_string(), |l| l.to_string());
                println!("  #{} x={} y={} link={}", id, node.x, node.y, link);
            }
        }
        Ok(())
    }

    pub fn sweep(args: SweepArgs, cli: &Cli) -> Result<()> {
        let report = match &args.fixture {
            Some(name) => {
                let fixture = lookup(cli, name);
                let table = match coverage::sweep(fixture) {
                    Ok(Some(table)) => table,
                    Ok(None) => fail(
                        cli,
                        JsonError::new(
                            "NoSweepDomain",
                            &format!("{} has no sweep domain", fixture),
                            output::E_INVALID_INPUT,
                        ),
                        output::EXIT_USAGE,
                    ),
                    Err(err) => {
                        let (json, code) = classify(&err);
                        fail(cli, json, code);
                    }
                };
                SweepReport { tables: vec![table] }
            }
            None => match coverage::sweep_all() {
                Ok(report) => report,
                Err(err) => {
                    let (json, code) = classify(&err);
                    fail(cli, json, code);
                }
            },
        };

        if let Some(path) = &args.report {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize sweep report")?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write sweep report to {}", path))?;
        }

        match cli.output {
            OutputFormat::Human => {
                for table in &report.tables {
                    print_table(table);
                }
            }
            _ => emit(cli, &report),
        }
        Ok(())
    }

    fn print_table(table: &OutcomeTable) {
        output::header(&format!("{} ({} inputs)", table.fixture, table.inputs));
        for (label, stats) in &table.outcomes {
            println!(
                "  {:<22} {:>7}  witness: ({})",
                label,
                stats.count,
                stats.witness.join(", ")
            );
        }
        if !table.missing.is_empty() {
            println!("  never reached: {}", table.missing.join(" "));
        }
        println!();
    }
}

// ============================================================================
// Tests
// ============================================================================
