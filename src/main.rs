use clap::{Parser, ValueEnum};
use log::{error, info};
use path_engine::models::{DEFAULT_NODE_I, DEFAULT_NODE_J};
use path_engine::{run, NodePair, PathValueError, PipelineConfig, TotalsFormat};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "path_values")]
#[command(about = "Compute hourly path values for a node pair and its reverse from a CSV with columns h, n, rho, gamma, v, df")]
struct Args {
    /// Path to input CSV with columns: h, n, rho, gamma, v, df
    #[arg(long)]
    input: PathBuf,

    /// Path to write per-hour path values CSV (columns: h, path, v_hourly)
    #[arg(long)]
    output_hourly: PathBuf,

    /// Source node of the forward path
    #[arg(long, default_value = DEFAULT_NODE_I)]
    node_i: String,

    /// Sink node of the forward path
    #[arg(long, default_value = DEFAULT_NODE_J)]
    node_j: String,

    /// Print vobl and vopt totals per path to stdout
    #[arg(long)]
    print_totals: bool,

    /// Format of the printed totals
    #[arg(long, value_enum, default_value = "text")]
    totals_format: SummaryFormat,
}

#[derive(Clone, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
}

impl Args {
    fn into_config(self) -> Result<PipelineConfig, PathValueError> {
        let nodes = NodePair::new(self.node_i, self.node_j)?;
        let mut config = PipelineConfig::new(self.input, self.output_hourly).with_nodes(nodes);

        if self.print_totals {
            config = config.with_totals(match self.totals_format {
                SummaryFormat::Text => TotalsFormat::Text,
                SummaryFormat::Json => TotalsFormat::Json,
            });
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let outcome = args.into_config().and_then(|config| {
        info!(
            "Valuing path {} from {}",
            config.nodes.forward_label(),
            config.input.display()
        );
        run(&config)
    });

    match outcome {
        Ok(report) => {
            if let Some(summary) = report.summary {
                println!("{}", summary);
            }
            info!(
                "Done: {} usable rows, {} hourly rows written",
                report.stats.usable_rows, report.hourly_rows
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:?} failure", err.failure_class());
            eprintln!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
