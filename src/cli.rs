use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use graphforce::LayoutConfig;
use graphforce::engine::LayoutEngine;
use graphforce::io::Format;
use graphforce::snapshot::{Output, Trajectory};

/// Headless force-directed graph layout.
#[derive(Parser, Debug)]
#[command(name = "graphforce")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (off, error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a layout until it converges and write the result
    Run {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Stop after this many ticks even if the layout has not converged
        #[arg(long)]
        max_ticks: Option<usize>,

        /// Record a frame every N ticks and write the whole trajectory
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        every: Option<u64>,

        /// Output file (.json, .yaml); stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format, overriding the output file extension
        #[arg(short, long)]
        format: Option<Format>,
    },
    /// Print the effective configuration
    Config {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Output format
        #[arg(short, long, default_value = "yaml")]
        format: Format,
    },
}

/// Configuration file plus per-field overrides
#[derive(clap::Args, Debug)]
pub struct LayoutArgs {
    /// Layout configuration file (.yaml, .yml, .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of nodes
    #[arg(long, allow_negative_numbers = true)]
    pub nodes: Option<i64>,

    /// Requested number of edges
    #[arg(long, allow_negative_numbers = true)]
    pub edges: Option<i64>,

    /// Spread constant scaling both forces
    #[arg(long)]
    pub spread: Option<f32>,

    /// Step coefficient decrement per tick
    #[arg(long)]
    pub decrement: Option<f32>,

    /// Initial step coefficient
    #[arg(long)]
    pub initial_step: Option<f32>,

    /// Seed for the random initial layout
    #[arg(long)]
    pub seed: Option<u64>,
}

impl LayoutArgs {
    /// Load the configuration file, if any, then apply flag overrides
    pub fn resolve(&self) -> anyhow::Result<LayoutConfig> {
        let mut config = match &self.config {
            Some(path) => LayoutConfig::from_path(path)?,
            None => LayoutConfig::default(),
        };

        if let Some(nodes) = self.nodes {
            config.node_count = nodes;
        }
        if let Some(edges) = self.edges {
            config.edge_count = edges;
        }
        if let Some(spread) = self.spread {
            config.spread = spread;
        }
        if let Some(decrement) = self.decrement {
            config.decrement = decrement;
        }
        if let Some(initial_step) = self.initial_step {
            config.initial_step = initial_step;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run {
            layout,
            max_ticks,
            every,
            output,
            format,
        } => {
            let config = layout.resolve()?;
            let output = Output::resolve(output.as_deref(), format)?;
            simulate(config, max_ticks, every, output)
        }
        Commands::Config { layout, format } => {
            let config = layout.resolve()?;
            Output::Stdout(format).write(&config)?;
            Ok(())
        }
    }
}

fn simulate(
    config: LayoutConfig,
    max_ticks: Option<usize>,
    every: Option<u64>,
    output: Output<'_>,
) -> anyhow::Result<()> {
    let mut engine = LayoutEngine::new(&config)?;
    let limit = tick_limit(max_ticks, &config);
    info!(
        nodes = engine.node_count(),
        edges = engine.edge_count(),
        limit,
        "starting layout"
    );

    match every {
        Some(every) => {
            let mut trajectory = Trajectory::new(config);
            trajectory.record(engine.snapshot());
            let mut applied = 0;
            while applied < limit && engine.tick() {
                applied += 1;
                if engine.ticks() % every == 0 {
                    trajectory.record(engine.snapshot());
                }
            }
            trajectory.record(engine.snapshot());
            log_finish(&engine, &output);
            output.write(&trajectory)?;
        }
        None => {
            engine.run_to_convergence(limit);
            log_finish(&engine, &output);
            output.write(&engine.snapshot())?;
        }
    }

    Ok(())
}

fn tick_limit(max_ticks: Option<usize>, config: &LayoutConfig) -> usize {
    // one extra tick absorbs rounding in the step coefficient
    max_ticks.unwrap_or_else(|| config.max_ticks().saturating_add(1))
}

fn log_finish(engine: &LayoutEngine, output: &Output<'_>) {
    let target = match output {
        Output::Stdout(_) => "stdout".to_string(),
        Output::File { path, .. } => path.display().to_string(),
    };
    info!(
        ticks = engine.ticks(),
        converged = engine.is_converged(),
        degenerate_pairs = engine.degenerate_pairs(),
        output = %target,
        "layout finished"
    );
}
