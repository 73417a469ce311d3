use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use stepchart_core::{AppConfig, ChartDocument, ChartError, ChartStore, TrackCount, Turn};
use tracing_subscriber::EnvFilter;

fn main() -> stepchart_core::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    init_tracing(&config.log_filter);

    match cli.command {
        Commands::Stats { input } => run_stats(&input),
        Commands::Convert { input, output, to } => run_convert(&input, &output, to),
        Commands::Transform {
            input,
            output,
            tracks,
            map,
        } => run_transform(&input, &output, tracks, map.as_deref()),
        Commands::Apply {
            input,
            output,
            turn,
            no_holds,
            little,
            seed,
        } => {
            let mut options = config.options;
            if let Some(turn) = turn {
                options.turn = turn.into();
            }
            options.hold_notes &= !no_holds;
            options.little |= little;
            if let Some(seed) = seed {
                options.shuffle_seed = seed;
            }
            let chart = load_chart(&input)?;
            save_chart(&output, &options.apply(&chart)?)
        }
    }
}

fn run_stats(input: &Path) -> stepchart_core::Result<()> {
    let chart = load_chart(input)?;
    let summary = chart.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_convert(input: &Path, output: &Path, to: HoldForm) -> stepchart_core::Result<()> {
    let chart = load_chart(input)?;
    tracing::info!(?to, "converting hold notes");
    let converted = match to {
        HoldForm::Holds => chart.markers_to_holds().bodies_to_holds(),
        HoldForm::Markers => chart.to_markers(),
        HoldForm::Bodies => chart.to_bodies(),
    };
    save_chart(output, &converted)
}

fn run_transform(
    input: &Path,
    output: &Path,
    tracks: usize,
    map: Option<&str>,
) -> stepchart_core::Result<()> {
    let chart = load_chart(input)?;
    let tracks = TrackCount::new(tracks)?;
    let out = match map {
        Some(map) => {
            let mapping = parse_mapping(map)?;
            tracing::info!(?mapping, "remapping tracks");
            ChartStore::load_transformed(&chart, tracks, &mapping)?
        }
        None => {
            tracing::info!(tracks = tracks.get(), "autogenerating with sliding window");
            ChartStore::load_transformed_sliding_window(&chart, tracks)
        }
    };
    save_chart(output, &out)
}

/// Parses `1,-,0` into `[Some(1), None, Some(0)]`.
fn parse_mapping(map: &str) -> stepchart_core::Result<Vec<Option<usize>>> {
    map.split(',')
        .map(str::trim)
        .map(|entry| match entry {
            "-" | "-1" => Ok(None),
            other => other
                .parse()
                .map(Some)
                .map_err(|_| ChartError::msg(format!("invalid track `{other}` in mapping"))),
        })
        .collect()
}

fn load_chart(path: &Path) -> stepchart_core::Result<ChartStore> {
    tracing::info!(?path, "loading chart");
    ChartDocument::load(path)?.to_store()
}

fn save_chart(path: &Path, chart: &ChartStore) -> stepchart_core::Result<()> {
    tracing::info!(?path, tracks = chart.num_tracks(), holds = chart.num_hold_notes(), "writing chart");
    ChartDocument::from_store(chart).save(path)
}

fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Rhythm game chart tools", long_about = None)]
struct Cli {
    /// Optional JSON config with player options and log filter.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print note statistics for a chart.
    Stats {
        input: PathBuf,
    },
    /// Switch hold notes between explicit spans and inline markers.
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum)]
        to: HoldForm,
    },
    /// Rebuild a chart for a different number of tracks.
    Transform {
        input: PathBuf,
        output: PathBuf,
        /// Track count of the generated chart.
        #[arg(short, long)]
        tracks: usize,
        /// Comma separated source track per destination track, `-` for none.
        /// Without it a sliding window is used.
        #[arg(short, long)]
        map: Option<String>,
    },
    /// Apply player options (turn, little, holds) to a chart.
    Apply {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum)]
        turn: Option<TurnArg>,
        #[arg(long)]
        no_holds: bool,
        #[arg(long)]
        little: bool,
        /// Seed for the shuffle turn.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HoldForm {
    /// Explicit hold spans, decoding both marker forms.
    Holds,
    /// Begin/end markers (2s and 3s).
    Markers,
    /// Body markers on every held row (4s).
    Bodies,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TurnArg {
    Off,
    Mirror,
    Left,
    Right,
    Shuffle,
}

impl From<TurnArg> for Turn {
    fn from(value: TurnArg) -> Self {
        match value {
            TurnArg::Off => Turn::Off,
            TurnArg::Mirror => Turn::Mirror,
            TurnArg::Left => Turn::Left,
            TurnArg::Right => Turn::Right,
            TurnArg::Shuffle => Turn::Shuffle,
        }
    }
}
