//! Command-line interface for the peoplegraph utility
//!
//! Provides a CLI to lay out entity relationship documents and inspect how
//! they split into clusters.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use peoplegraph::core::logging::{init_logging, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
use peoplegraph::graph::{
    partition, DocumentSource, FileSource, GraphDatabase, GraphDocument, GraphLayout,
    GraphLayoutEngine, LayoutConfig, Membership, PartitionStrategy, StdinSource,
};
use peoplegraph::LayoutAlgorithm;

/// Peoplegraph - Lay out entity relationship graphs
#[derive(Parser)]
#[command(name = "peoplegraph")]
#[command(about = "Lay out entity relationship graphs as clustered hierarchies")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lay out a graph document and write the layout as JSON
    Layout {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the layout (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with layout configuration overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// How edges are grouped into clusters
        #[arg(long, value_enum)]
        partition: Option<PartitionChoice>,

        /// How nodes shared between clusters are placed
        #[arg(long, value_enum)]
        membership: Option<MembershipChoice>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the clusters a graph document splits into
    Clusters {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// How edges are grouped into clusters
        #[arg(long, value_enum)]
        partition: Option<PartitionChoice>,
    },

    /// Check a graph document and report problems
    Validate {
        /// Input graph document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// Partition strategies selectable from the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum PartitionChoice {
    Source,
    Target,
    Label,
    Single,
}

impl From<PartitionChoice> for PartitionStrategy {
    fn from(value: PartitionChoice) -> Self {
        match value {
            PartitionChoice::Source => PartitionStrategy::Source,
            PartitionChoice::Target => PartitionStrategy::Target,
            PartitionChoice::Label => PartitionStrategy::Label,
            PartitionChoice::Single => PartitionStrategy::Single,
        }
    }
}

/// Membership policies selectable from the command line
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum MembershipChoice {
    /// Lay a shared node out in every cluster that references it
    Duplicate,
    /// Lay a shared node out only in its first cluster
    FirstCluster,
}

impl From<MembershipChoice> for Membership {
    fn from(value: MembershipChoice) -> Self {
        match value {
            MembershipChoice::Duplicate => Membership::Duplicate,
            MembershipChoice::FirstCluster => Membership::FirstCluster,
        }
    }
}

/// Main CLI application
#[derive(Default)]
pub struct PeoplegraphApp {
    config: LayoutConfig,
}

impl PeoplegraphApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());
        let log_format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Peoplegraph v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Layout {
                input,
                output,
                config,
                partition,
                membership,
                pretty,
            } => {
                self.apply_overrides(config.as_deref(), partition, membership)?;
                self.layout_command(input, output, pretty, cli.verbose)
            }
            Commands::Clusters { input, partition } => {
                self.apply_overrides(None, partition, None)?;
                self.clusters_command(input, cli.verbose)
            }
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
        }
    }

    /// Merge a config file and command-line flags into the layout config
    ///
    /// Flags win over the file.
    pub fn apply_overrides(
        &mut self,
        config_path: Option<&Path>,
        partition: Option<PartitionChoice>,
        membership: Option<MembershipChoice>,
    ) -> Result<()> {
        if let Some(path) = config_path {
            self.config = LayoutConfig::from_file(path)?;
        }
        if let Some(choice) = partition {
            self.config.partition = choice.into();
        }
        if let Some(choice) = membership {
            self.config.membership = choice.into();
        }
        Ok(())
    }

    /// Get the effective layout config (for testing)
    #[cfg(test)]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Handle the layout command
    fn layout_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        pretty: bool,
        verbose: bool,
    ) -> Result<()> {
        debug!(config = ?self.config, "Running layout command");
        let document = self.read_input(input)?;
        if verbose {
            eprintln!(
                "Read {} nodes and {} edges",
                document.nodes.len(),
                document.edges.len()
            );
        }

        let layout = self.compute_layout(document)?;
        if verbose {
            eprintln!(
                "Laid out {} nodes in {} clusters",
                layout.nodes.len(),
                layout.clusters.len()
            );
        }

        let json = if pretty {
            serde_json::to_string_pretty(&layout)?
        } else {
            serde_json::to_string(&layout)?
        };
        self.write_output(output, &json)
    }

    /// Lay out a document, keeping dropped elements in the report
    pub fn compute_layout(&self, document: GraphDocument) -> Result<GraphLayout> {
        let (database, issues) = GraphDatabase::from_document(document);
        let mut layout = GraphLayoutEngine::with_config(self.config.clone()).layout(&database)?;
        layout.report.integrity_issues = issues;
        Ok(layout)
    }

    /// Handle the clusters command
    fn clusters_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let document = self.read_input(input)?;
        if verbose {
            eprintln!("Partitioning by {:?}", self.config.partition);
        }
        print!("{}", self.cluster_summary(document));
        io::stdout().flush()?;
        Ok(())
    }

    /// One line per cluster: anchor, node count, edge count
    pub fn cluster_summary(&self, document: GraphDocument) -> String {
        let (database, _) = GraphDatabase::from_document(document);
        let clusters = partition(&database, &self.config.partition, self.config.membership);

        let mut summary = String::new();
        for cluster in &clusters {
            let _ = writeln!(
                summary,
                "{}\t{} nodes\t{} edges",
                cluster.anchor,
                cluster.node_count(),
                cluster.edge_count()
            );
        }
        let _ = writeln!(summary, "Total: {} clusters", clusters.len());
        summary
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let document = match self.read_input(input) {
            Ok(document) => document,
            Err(e) => {
                println!("✗ Invalid graph document: {}", e);
                return Err(e);
            }
        };
        if verbose {
            eprintln!(
                "Read {} nodes and {} edges",
                document.nodes.len(),
                document.edges.len()
            );
        }

        print!("{}", self.validation_report(document)?);
        io::stdout().flush()?;
        Ok(())
    }

    /// Human readable validation result
    ///
    /// Integrity issues, cycles and orphans are reported but do not fail.
    pub fn validation_report(&self, document: GraphDocument) -> Result<String> {
        let layout = self.compute_layout(document)?;
        let report = &layout.report;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "✓ Valid graph: {} nodes, {} edges, {} clusters",
            layout.nodes.len(),
            layout.edges.len(),
            layout.clusters.len()
        );
        for issue in &report.integrity_issues {
            let _ = writeln!(out, "✗ Dropped: {}", issue);
        }
        for cycle in &report.cycle_warnings {
            let _ = writeln!(out, "⚠ {}", cycle);
        }
        for orphan in &report.orphans {
            let _ = writeln!(out, "⚠ Orphan node '{}' is not laid out", orphan);
        }
        Ok(out)
    }

    /// Read a graph document from a file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<GraphDocument> {
        let source: Box<dyn DocumentSource> = match input {
            Some(path) if path.to_string_lossy() != "-" => Box::new(FileSource::new(path)),
            _ => Box::new(StdinSource),
        };
        Ok(source.load()?)
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}
