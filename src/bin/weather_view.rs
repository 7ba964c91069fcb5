//! Terminal front-end for the weather proxy.
//!
//! Type a city and press Enter to search. An empty line resubmits the
//! current city; `:c` / `:f` switch units, `:t` toggles the theme and `:q`
//! quits.

use anyhow::{bail, Context};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use weather_app::domain::{Theme, UnitSystem, WeatherQuery, DEFAULT_CITY};
use weather_app::view::render::{render_card, render_dashboard};
use weather_app::view::{ProxySource, RefreshOutcome, WeatherController};

#[derive(Debug, Parser)]
#[command(name = "weather_view", version, about = "Current weather and a 3-day outlook")]
struct Args {
    /// City to show on start
    #[arg(long, default_value = DEFAULT_CITY)]
    city: String,

    /// metric or imperial
    #[arg(long, default_value = "metric")]
    units: UnitSystem,

    /// Base URL of the weather proxy
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    api_url: String,

    /// Start with the dark theme
    #[arg(long)]
    dark: bool,

    /// Print a one-line card instead of the dashboard
    #[arg(long)]
    compact: bool,

    /// Give up on a refresh after this many seconds
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,

    /// Fetch once, print and exit
    #[arg(long)]
    once: bool,
}

enum Command {
    Search(String),
    Resubmit,
    Units(UnitSystem),
    ToggleTheme,
    Quit,
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        "" => Command::Resubmit,
        ":c" => Command::Units(UnitSystem::Metric),
        ":f" => Command::Units(UnitSystem::Imperial),
        ":t" => Command::ToggleTheme,
        ":q" => Command::Quit,
        city => Command::Search(city.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let args = Args::parse();
    let timeout = Duration::from_secs(args.timeout_secs);

    let source = ProxySource::new(&args.api_url, timeout).context("building HTTP client")?;
    let theme = if args.dark { Theme::Dark } else { Theme::Light };
    let controller = WeatherController::new(Arc::new(source))
        .with_timeout(timeout)
        .with_query(WeatherQuery::new(args.city.clone(), args.units))
        .with_theme(theme);

    let render = |controller: &WeatherController| {
        let state = controller.snapshot();
        if args.compact {
            render_card(&state)
        } else {
            render_dashboard(&state)
        }
    };

    let outcome = controller.submit().await;
    println!("{}", render(&controller));

    if args.once {
        if let RefreshOutcome::Failed(e) = outcome {
            bail!("could not load weather for {}: {}", args.city, e);
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let outcome = match parse_command(&line) {
            Command::Quit => break,
            Command::Search(city) => Some(controller.set_city(city).await),
            Command::Resubmit => Some(controller.submit().await),
            Command::Units(units) => Some(controller.set_unit_system(units).await),
            Command::ToggleTheme => {
                controller.toggle_theme();
                None
            }
        };
        if let Some(RefreshOutcome::Failed(e)) = &outcome {
            eprintln!("could not refresh: {e}");
        }
        println!("{}", render(&controller));
    }

    Ok(())
}
