//! skymatrix: show nearby aircraft from an FR24 feeder on an LED matrix.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use comfy_table::{Cell, Table};
use serde::Serialize;
use tracing::info;

use skymatrix_core::bearing::DEFAULT_ORIENTATION_DEG;
use skymatrix_core::config::{self, Config};
use skymatrix_core::layout::format_miles;
use skymatrix_core::{FeedAircraft, Position, Resolution, Resolver};

mod feeder;
mod logging;
mod panel;
mod poll;

use feeder::FeederClient;
use poll::{resolve_aircraft, PollSettings};

#[derive(Parser)]
#[command(
    name = "skymatrix",
    version,
    about = "Display flights on an LED matrix"
)]
struct Cli {
    /// Log heading details (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for values normally read from the config file.
#[derive(Args)]
struct LocationArgs {
    /// Device latitude (in degrees)
    #[arg(long, env = "SKYMATRIX_DEVICE_LAT", allow_negative_numbers = true)]
    device_lat: Option<f64>,

    /// Device longitude (in degrees)
    #[arg(long, env = "SKYMATRIX_DEVICE_LONG", allow_negative_numbers = true)]
    device_long: Option<f64>,

    /// FR24 feeder host and port
    #[arg(long, env = "SKYMATRIX_FEEDER_HOST")]
    fr24_feeder_host: Option<String>,

    /// Panel rotation relative to true north, in degrees
    #[arg(long, allow_negative_numbers = true)]
    orientation: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the feeder and page through aircraft on the panel
    Run {
        #[command(flatten)]
        location: LocationArgs,

        /// Fonts base directory (holds 5x7.bdf and 6x10.bdf)
        #[arg(long, env = "SKYMATRIX_FONTS_HOME")]
        fonts_home: Option<String>,

        /// Seconds between feeder polls
        #[arg(long)]
        poll_interval: Option<u64>,

        /// Seconds each aircraft page stays up
        #[arg(long)]
        page_dwell: Option<u64>,
    },

    /// Fetch once and print the aircraft table
    List {
        #[command(flatten)]
        location: LocationArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Resolve bearing, distance and arrow between two points
    Resolve {
        #[arg(allow_negative_numbers = true)]
        observer_lat: f64,
        #[arg(allow_negative_numbers = true)]
        observer_lon: f64,
        #[arg(allow_negative_numbers = true)]
        target_lat: f64,
        #[arg(allow_negative_numbers = true)]
        target_lon: f64,

        /// Panel rotation relative to true north, in degrees
        #[arg(long, default_value_t = DEFAULT_ORIENTATION_DEG, allow_negative_numbers = true)]
        orientation: f64,
    },

    /// Manage ~/.skymatrix/config.yaml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            location,
            fonts_home,
            poll_interval,
            page_dwell,
        } => {
            let mut config = effective_config(&location);
            if fonts_home.is_some() {
                config.panel.fonts_home = fonts_home;
            }
            if let Some(v) = poll_interval {
                config.feeder.poll_interval_sec = v;
            }
            if let Some(v) = page_dwell {
                config.feeder.page_dwell_sec = v;
            }
            cmd_run(config).await
        }
        Commands::List { location, json } => cmd_list(effective_config(&location), json).await,
        Commands::Resolve {
            observer_lat,
            observer_lon,
            target_lat,
            target_lon,
            orientation,
        } => cmd_resolve(
            (observer_lat, observer_lon),
            (target_lat, target_lon),
            orientation,
        ),
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => cmd_config_init(&config::config_file(), force),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Config file values with command-line overrides applied.
fn effective_config(location: &LocationArgs) -> Config {
    let mut config = config::load_config();
    if let Some(v) = location.device_lat {
        config.device.lat = Some(v);
    }
    if let Some(v) = location.device_long {
        config.device.lon = Some(v);
    }
    if let Some(v) = &location.fr24_feeder_host {
        config.feeder.host = v.clone();
    }
    if let Some(v) = location.orientation {
        config.device.orientation_deg = v;
    }
    config
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Observer, resolver and feeder client shared by `run` and `list`.
fn setup(config: &Config) -> (Position, Resolver, FeederClient) {
    let observer = config.observer().unwrap_or_else(|e| fail(e));
    let resolver = Resolver::new(config.device.orientation_deg).unwrap_or_else(|e| fail(e));
    let client = FeederClient::new(&config.feeder.host).unwrap_or_else(|e| fail(e));
    (observer, resolver, client)
}

async fn cmd_run(config: Config) {
    let (observer, resolver, client) = setup(&config);
    let mut panel = panel::open(&config.panel).unwrap_or_else(|e| fail(e));

    info!(
        observer = %observer,
        orientation = resolver.orientation_deg(),
        feeder = client.url(),
        "Press CTRL-C to stop."
    );

    let settings = PollSettings {
        poll_interval: Duration::from_secs(config.feeder.poll_interval_sec),
        page_dwell: Duration::from_secs(config.feeder.page_dwell_sec),
    };
    if let Err(e) = poll::run(&client, &resolver, &observer, panel.as_mut(), settings).await {
        fail(e);
    }
}

#[derive(Serialize)]
struct ListRow<'a> {
    key: &'a str,
    #[serde(flatten)]
    aircraft: &'a FeedAircraft,
    resolution: Option<Resolution>,
}

async fn cmd_list(config: Config, json: bool) {
    let (observer, resolver, client) = setup(&config);
    let snapshot = client.fetch().await.unwrap_or_else(|e| fail(e));

    let rows: Vec<ListRow> = snapshot
        .iter()
        .map(|(key, aircraft)| ListRow {
            key,
            aircraft,
            resolution: resolve_aircraft(&resolver, &observer, aircraft),
        })
        .collect();

    if json {
        match serde_json::to_string_pretty(&rows) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(e),
        }
        return;
    }

    println!();
    println!("Feeder: {}", client.url());
    println!("Observer: {observer}");
    println!("  {} aircraft", rows.len());
    println!();

    if rows.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Mode S", "Callsign", "Squawk", "Alt (ft)", "Speed (kts)", "Distance", "Azimuth", "Dir",
        "Arrow",
    ]);

    for row in &rows {
        let ac = row.aircraft;
        let r = row.resolution.as_ref();
        table.add_row(vec![
            Cell::new(&ac.mode_s),
            Cell::new(ac.callsign.as_deref().unwrap_or("-")),
            Cell::new(ac.squawk.as_deref().unwrap_or("-")),
            Cell::new(
                ac.altitude_ft
                    .map(|a| a.to_string())
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                ac.ground_speed()
                    .map(|s| s.to_string())
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                r.map(|r| format_miles(r.distance_miles()))
                    .unwrap_or("-".into()),
            ),
            Cell::new(
                r.map(|r| format!("{:.1}", r.azimuth_deg))
                    .unwrap_or("-".into()),
            ),
            Cell::new(r.map(|r| r.true_direction.label()).unwrap_or("?")),
            Cell::new(
                r.map(|r| r.display_direction.arrow().to_string())
                    .unwrap_or("?".into()),
            ),
        ]);
    }

    println!("{table}");
}

fn cmd_resolve(observer: (f64, f64), target: (f64, f64), orientation: f64) {
    let observer = Position::new(observer.0, observer.1).unwrap_or_else(|e| fail(e));
    let target = Position::new(target.0, target.1).unwrap_or_else(|e| fail(e));
    let r = skymatrix_core::resolve(&observer, &target, orientation).unwrap_or_else(|e| fail(e));

    println!();
    println!("  Observer:     {observer}");
    println!("  Target:       {target}");
    println!("  Azimuth:      {:.3}°", r.azimuth_deg);
    println!(
        "  Distance:     {:.1} m ({})",
        r.distance_m,
        format_miles(r.distance_miles())
    );
    println!("  Direction:    {}", r.true_direction);
    println!("  Orientation:  {orientation}°");
    println!("  Panel:        {:.3}°", r.display_heading_deg);
    println!(
        "  Arrow:        {} {}",
        r.display_direction.arrow(),
        r.display_direction
    );
    println!();
}

/// Write default config to `path`. Refuses to overwrite unless `force`.
fn write_default_config(path: &Path, force: bool) -> Result<PathBuf, String> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    config::save_config_to(&Config::default(), path).map_err(|e| e.to_string())?;
    Ok(path.to_path_buf())
}

fn cmd_config_init(path: &Path, force: bool) {
    match write_default_config(path, force) {
        Ok(p) => println!("Wrote {}", p.display()),
        Err(e) => fail(e),
    }
}

fn cmd_config_show() {
    let path = config::config_file();
    println!("# {}", path.display());
    print!("{}", config::serialize_config(&config::load_config()));
}
