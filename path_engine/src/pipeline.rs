use crate::calculator::PathValueCalculator;
use crate::data_loader::DataLoader;
use crate::error::Result;
use crate::models::{LoadStats, NodePair, PathTotals, TotalsFormat};
use crate::schema::validate_columns;
use crate::totals::compute_totals;
use crate::writer::{render_totals, write_hourly_csv};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output_hourly: PathBuf,
    pub nodes: NodePair,
    pub print_totals: bool,
    pub totals_format: TotalsFormat,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, output_hourly: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_hourly: output_hourly.into(),
            nodes: NodePair::default(),
            print_totals: false,
            totals_format: TotalsFormat::default(),
        }
    }

    pub fn with_nodes(mut self, nodes: NodePair) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_totals(mut self, format: TotalsFormat) -> Self {
        self.print_totals = true;
        self.totals_format = format;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub stats: LoadStats,
    pub hourly_rows: usize,
    pub totals: Vec<PathTotals>,
    /// Rendered console summary, present when totals were requested.
    pub summary: Option<String>,
}

/// Read, validate, value and write in a single pass.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    info!("Reading {}", config.input.display());
    let table = DataLoader::read_table(&config.input)?;

    validate_columns(&table)?;

    let calculator = PathValueCalculator::new(config.nodes.clone());
    let (hourly, stats) = calculator.calculate(&table)?;

    write_hourly_csv(&config.output_hourly, &hourly)?;
    info!(
        "Wrote {} hourly rows to {}",
        hourly.len(),
        config.output_hourly.display()
    );

    let totals = compute_totals(&hourly);
    let summary = if config.print_totals {
        Some(render_totals(&totals, config.totals_format)?)
    } else {
        None
    };

    Ok(PipelineReport {
        stats,
        hourly_rows: hourly.len(),
        totals,
        summary,
    })
}
