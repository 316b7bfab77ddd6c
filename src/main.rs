use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use tabviz::reader::{self, SourceFormat};
use tabviz::runtime::Visualizer;
use tabviz::{ChartKind, VisualizerOptions};

#[derive(Parser, Debug)]
#[command(name = "tabviz")]
#[command(about = "Aggregate tabular data into chart-ready series", long_about = None)]
struct Args {
    /// Input file (.csv or .json). Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Input format when reading stdin or overriding the file extension
    #[arg(long, value_enum)]
    format: Option<SourceFormat>,

    /// Chart type
    #[arg(long, value_enum, default_value_t = ChartKind::Bar)]
    chart: ChartKind,

    /// Category column (defaults to the first column)
    #[arg(long)]
    primary: Option<String>,

    /// Value column (defaults to the first numeric column)
    #[arg(long)]
    value: Option<String>,

    /// Group-by column (bar charts only)
    #[arg(long)]
    group: Option<String>,

    /// JSON file with visualizer options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let options = match &args.config {
        Some(path) => VisualizerOptions::from_json_file(path)?,
        None => VisualizerOptions::default(),
    };

    let table = match (&args.input, args.format) {
        (Some(path), None) => reader::read_path(path)
            .with_context(|| format!("Failed to load '{}'", path.display()))?,
        (Some(path), Some(format)) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open '{}'", path.display()))?;
            reader::read_table(file, format, path.display().to_string())
                .with_context(|| format!("Failed to load '{}'", path.display()))?
        }
        (None, format) => {
            let format = format.unwrap_or(SourceFormat::Csv);
            reader::read_table(io::stdin().lock(), format, "stdin")
                .context("Failed to read table from stdin")?
        }
    };

    let now = Instant::now();
    let mut viz = Visualizer::new(options);
    viz.set_chart_kind(args.chart, now);
    viz.load_table(table, now);

    if let Some(primary) = args.primary {
        viz.set_primary_column(primary, now);
    }
    if let Some(value) = args.value {
        viz.set_value_column(value, now);
    }
    if args.group.is_some() {
        viz.set_secondary_column(args.group, now);
    }

    let output = viz.output();
    if output.is_empty() {
        eprintln!("Warning: no data available for visualization");
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    }
    .context("Failed to serialize chart data")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).context("Failed to write chart data to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
