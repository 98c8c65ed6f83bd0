use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;

use wakeline::events::{EventFilter, ManeuverKind};
use wakeline::query::TimeExpr;
use wakeline::race::{Boat, BoatId, MarkId, RaceConfig, ReferenceMode};
use wakeline::stats::write_statistics_csv;
use wakeline::store::{MemoryStore, StoreError};
use wakeline::track::{downsample, read_gpx_file, TrackError, TrackPoint};
use wakeline::{AnalysisConfig, AnalysisError, Analyzer, ConfigError, WindowQuery};

#[derive(Parser)]
#[command(name = "wakeline")]
#[command(about = "Sailing race track analysis")]
struct Cli {
    /// Analysis configuration (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resample a GPX track onto a uniform time grid
    Resample {
        track: PathBuf,
        /// Keep every n-th point
        #[arg(long, default_value_t = 1)]
        every: usize,
    },
    /// List tacks and gybes detected in a GPX track
    Events {
        track: PathBuf,
        #[arg(long)]
        kind: Option<ManeuverKind>,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Window statistics for one or more boats of a race
    Stats {
        /// Race configuration (YAML)
        #[arg(long)]
        race: PathBuf,
        #[arg(required = true)]
        tracks: Vec<PathBuf>,
        #[command(flatten)]
        window: WindowArgs,
        #[command(flatten)]
        reference: ReferenceArgs,
        /// Also write the statistics as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Compare a target boat against a reference boat over one window
    Compare {
        /// Race configuration (YAML)
        #[arg(long)]
        race: PathBuf,
        reference_track: PathBuf,
        target_track: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
        #[command(flatten)]
        reference: ReferenceArgs,
    },
}

#[derive(clap::Args)]
struct WindowArgs {
    /// Window start: RFC3339, RFC3339 +/- duration, or T+<duration>
    #[arg(long)]
    from: Option<TimeExpr>,
    /// Window end, same forms as --from
    #[arg(long)]
    to: Option<TimeExpr>,
}

#[derive(clap::Args)]
struct ReferenceArgs {
    /// Reference direction: twd or mark
    #[arg(long, default_value = "twd")]
    mode: ReferenceMode,
    /// Mark id for --mode mark (defaults to the first mark of the course)
    #[arg(long)]
    mark: Option<MarkId>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Analysis(#[from] AnalysisError),
    #[error("{0}")]
    Track(#[from] TrackError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    let analyzer = Analyzer::try_new(config)?;
    let format = cli.format;

    match cli.command {
        Commands::Resample { track, every } => {
            let fixes = read_gpx_file(&track)?;
            let (points, _) = analyzer.process_fixes(&fixes)?;
            emit(format, &downsample(&points, every))
        }
        Commands::Events {
            track,
            kind,
            window,
        } => {
            let fixes = read_gpx_file(&track)?;
            let (points, events) = analyzer.process_fixes(&fixes)?;
            let (t0, t1) = window.bounds(&points, None);
            let mut filter = EventFilter::between(t0, t1);
            filter.kind = kind;
            let events: Vec<_> = events.into_iter().filter(|e| filter.matches(e)).collect();
            emit(format, &events)
        }
        Commands::Stats {
            race,
            tracks,
            window,
            reference,
            csv,
        } => {
            let race = load_race(&race)?;
            let start = race.start_time;
            let (store, boats) = load_fleet(&analyzer, race, &tracks)?;
            let query = window.query(&store, &boats, start, &reference)?;

            let rows = boats
                .iter()
                .map(|boat| Ok((boat.id, analyzer.window_statistics(&store, boat.id, &query)?)))
                .collect::<Result<Vec<_>, CliError>>()?;

            if let Some(path) = csv {
                let mut writer = csv::Writer::from_writer(File::create(path)?);
                write_statistics_csv(&rows, &mut writer)?;
            }

            let report: Vec<BoatReport> = rows
                .into_iter()
                .zip(&boats)
                .map(|((_, stats), boat)| BoatReport {
                    boat: boat.id,
                    sail_no: boat.sail_no.clone(),
                    stats,
                })
                .collect();
            emit(format, &report)
        }
        Commands::Compare {
            race,
            reference_track,
            target_track,
            window,
            reference,
        } => {
            let race = load_race(&race)?;
            let start = race.start_time;
            let (store, boats) = load_fleet(&analyzer, race, &[reference_track, target_track])?;
            let query = window.query(&store, &boats, start, &reference)?;
            let result = analyzer.compare_boats(&store, boats[0].id, boats[1].id, &query)?;
            emit(format, &result)
        }
    }
}

#[derive(Serialize)]
struct BoatReport {
    boat: BoatId,
    sail_no: String,
    #[serde(flatten)]
    stats: wakeline::stats::WindowStatistics,
}

impl WindowArgs {
    /// Resolve the bounds; open ends default to the extent of `points`.
    fn bounds(
        &self,
        points: &[TrackPoint],
        start: Option<DateTime<Utc>>,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        let first = points
            .first()
            .map(|p| p.timestamp)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let last = points
            .last()
            .map(|p| p.timestamp)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let anchor = start.unwrap_or(first);
        (
            self.from.map_or(first, |t| t.resolve(anchor)),
            self.to.map_or(last, |t| t.resolve(anchor)),
        )
    }

    fn query(
        &self,
        store: &MemoryStore,
        boats: &[Boat],
        race_start: DateTime<Utc>,
        reference: &ReferenceArgs,
    ) -> Result<WindowQuery, CliError> {
        let mut extent: Vec<TrackPoint> = Vec::new();
        for boat in boats {
            let track = store.track(boat.id)?;
            extent.extend(track.first().cloned());
            extent.extend(track.last().cloned());
        }
        extent.sort_by_key(|p| p.timestamp);

        let (t0, t1) = self.bounds(&extent, Some(race_start));
        Ok(WindowQuery {
            t0,
            t1,
            mode: reference.mode,
            mark_id: reference.mark,
        })
    }
}

fn load_race(path: &Path) -> Result<RaceConfig, CliError> {
    let yaml = fs::read_to_string(path)?;
    Ok(RaceConfig::from_yaml(&yaml)?)
}

/// One boat per track file, numbered from 1 in argument order.
fn load_fleet(
    analyzer: &Analyzer,
    race: RaceConfig,
    tracks: &[PathBuf],
) -> Result<(MemoryStore, Vec<Boat>), CliError> {
    let mut store = MemoryStore::new();
    let race_id = race.id;
    store.insert_race(race);

    let mut boats = Vec::with_capacity(tracks.len());
    for (i, path) in tracks.iter().enumerate() {
        let boat = Boat {
            id: i as BoatId + 1,
            race_id,
            sail_no: path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            label_color: "#1f77b4".to_string(),
        };
        store.insert_boat(boat.clone())?;
        store.append_raw_fixes(boat.id, read_gpx_file(path)?)?;
        analyzer.ingest(&mut store, boat.id)?;
        boats.push(boat);
    }
    Ok((store, boats))
}

fn emit<T: Serialize + ?Sized>(format: OutputFormat, value: &T) -> Result<(), CliError> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", text);
    Ok(())
}
