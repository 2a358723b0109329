//! Drive2U CLI
//!
//! Browse published trips, look up places, reserve seats and publish trips
//! against the Drive2U backend.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod terminal;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use application::ports::{MapRendererPort, NotificationPort};
use application::{
    ApplicationError, AuthService, BoardPorts, GeocodeSuggestion, Session, SubmitOutcome,
    SuggestionOutcome, TripBoard,
};
use clap::{Parser, Subcommand};
use domain::{FilterCriteria, NewTrip, TripId};
use infrastructure::{Adapters, AppConfig, init_telemetry};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::terminal::{TerminalMap, TerminalNotifier};

/// Drive2U CLI
#[derive(Parser)]
#[command(name = "drive2u")]
#[command(author, version, about = "Drive2U carpooling client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "DRIVE2U_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and print the session token
    ///
    /// Export the token as DRIVE2U_TOKEN for the other commands.
    Login {
        /// Account e-mail
        email: String,

        /// Account password
        #[arg(long, env = "DRIVE2U_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the signed-in user's name
    Profile {
        /// Session token
        #[arg(long, env = "DRIVE2U_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// List published trips
    Trips {
        /// Session token
        #[arg(long, env = "DRIVE2U_TOKEN", hide_env_values = true)]
        token: String,

        /// Minimum free seats
        #[arg(long, default_value = "")]
        cupos: String,

        /// Origin contains this text
        #[arg(long, default_value = "")]
        salida: String,

        /// Destination contains this text
        #[arg(long, default_value = "")]
        llegada: String,

        /// Print the map centre and markers too
        #[arg(long)]
        map: bool,

        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest places for a partial name
    Suggest {
        /// Text typed so far
        query: String,

        /// Result language (Accept-Language)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Reserve seats on a trip
    Reserve {
        /// Trip identifier
        trip_id: String,

        /// Session token
        #[arg(long, env = "DRIVE2U_TOKEN", hide_env_values = true)]
        token: String,

        /// Seats to reserve
        #[arg(short, long, default_value_t = 1)]
        seats: u32,

        /// Pickup or drop-off point, once per seat
        #[arg(short, long = "point", required = true)]
        points: Vec<String>,
    },

    /// Publish a trip as a driver
    CreateTrip {
        /// Session token
        #[arg(long, env = "DRIVE2U_TOKEN", hide_env_values = true)]
        token: String,

        /// Origin
        #[arg(long)]
        from: String,

        /// Destination
        #[arg(long)]
        to: String,

        /// Departure time, HH:MM
        #[arg(long)]
        time: String,

        /// Seats offered (1-4)
        #[arg(long)]
        seats: u32,

        /// Fare per passenger
        #[arg(long)]
        price: f64,

        /// Route description
        #[arg(long)]
        route: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => AppConfig::load().context("failed to load configuration"),
    }
}

fn session_for(token: String) -> Arc<Session> {
    Arc::new(Session::new(SecretString::from(token)))
}

/// Board with terminal presentation ports
fn board_for(
    config: &AppConfig,
    adapters: &Adapters,
    session: Arc<Session>,
    map: Arc<TerminalMap>,
) -> TripBoard {
    TripBoard::new(
        session,
        BoardPorts {
            trips: Arc::clone(&adapters.trips),
            geocoder: Arc::clone(&adapters.geocoder),
            map: map as Arc<dyn MapRendererPort>,
            notifier: Arc::new(TerminalNotifier) as Arc<dyn NotificationPort>,
        },
        config.map.clone(),
        config.suggestions.clone(),
    )
}

/// Exit after a failure
///
/// Board operations already notified the user about everything except
/// validation problems, so only those are printed here.
fn exit_with(error: &ApplicationError, notified: bool) -> ! {
    if !notified || error.is_validation() {
        eprintln!("❌ {}", error.user_message());
    }
    debug!(error = %error, "Command failed");
    std::process::exit(1);
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_telemetry(&config.telemetry.clone().with_verbosity(cli.verbose))?;

    if matches!(cli.command, Commands::Config) {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let adapters = Adapters::from_config(&config).unwrap_or_else(|e| exit_with(&e, false));

    match cli.command {
        Commands::Login { email, password } => {
            let auth = AuthService::new(Arc::clone(&adapters.auth));
            let session = auth
                .login(&email, &SecretString::from(password))
                .await
                .unwrap_or_else(|e| exit_with(&e, false));

            if let Some(profile) = session.profile() {
                eprintln!("👋 Welcome, {}", profile.full_name());
            }
            let token = session.token().unwrap_or_else(|e| exit_with(&e, false));
            println!("{}", token.expose_secret());
        },

        Commands::Profile { token } => {
            let auth = AuthService::new(Arc::clone(&adapters.auth));
            let profile = auth
                .refresh_profile(&session_for(token))
                .await
                .unwrap_or_else(|e| exit_with(&e, false));
            println!("{}", profile.full_name());
        },

        Commands::Trips {
            token,
            cupos,
            salida,
            llegada,
            map,
            json,
        } => {
            let criteria = FilterCriteria::from_inputs(&cupos, &salida, &llegada)
                .map_err(ApplicationError::from)
                .unwrap_or_else(|e| exit_with(&e, false));

            let terminal_map = Arc::new(TerminalMap::default());
            let board = board_for(
                &config,
                &adapters,
                session_for(token),
                Arc::clone(&terminal_map),
            );
            board.store().set_criteria(criteria);
            let view = board.load().await.unwrap_or_else(|e| exit_with(&e, true));

            if json {
                println!("{}", serde_json::to_string_pretty(&view.items)?);
            } else {
                print!("{}", terminal::format_trip_list(&view));
            }
            if map {
                if let Some(rendered) = terminal_map.last_view() {
                    print!("{}", terminal::format_map(&rendered));
                }
            }
        },

        Commands::Suggest { query, language } => {
            let mut suggestions = config.suggestions.clone();
            if let Some(language) = language {
                suggestions.language = language;
            }
            let min_chars = suggestions.min_query_chars;
            let suggester = GeocodeSuggestion::new(Arc::clone(&adapters.geocoder), suggestions);

            match suggester.input(&query).await {
                SuggestionOutcome::Applied(places) => {
                    print!("{}", terminal::format_suggestions(&places));
                },
                SuggestionOutcome::Cleared => {
                    eprintln!("Type at least {min_chars} characters to get suggestions.");
                },
                SuggestionOutcome::Failed => {
                    eprintln!("❌ Place search is unavailable right now.");
                    std::process::exit(1);
                },
                SuggestionOutcome::Superseded | SuggestionOutcome::Stale => {},
            }
        },

        Commands::Reserve {
            trip_id,
            token,
            seats,
            points,
        } => {
            let trip_id = TripId::new(trip_id)
                .map_err(ApplicationError::from)
                .unwrap_or_else(|e| exit_with(&e, false));
            let board = board_for(
                &config,
                &adapters,
                session_for(token),
                Arc::new(TerminalMap::default()),
            );
            board.load().await.unwrap_or_else(|e| exit_with(&e, true));

            let flow = board
                .reserve(&trip_id)
                .unwrap_or_else(|e| exit_with(&e, false));
            fill_reservation(&flow, seats, &points).unwrap_or_else(|e| exit_with(&e, false));

            match board.submit_reservation(&trip_id).await {
                Ok(SubmitOutcome::Confirmed(confirmation)) => {
                    if !confirmation.reservation_id.is_empty() {
                        println!("{}", confirmation.reservation_id);
                    }
                },
                Ok(SubmitOutcome::Ignored) => {},
                Err(e) => exit_with(&e, true),
            }
        },

        Commands::CreateTrip {
            token,
            from,
            to,
            time,
            seats,
            price,
            route,
        } => {
            let new_trip = NewTrip::new(&from, &to, &time, seats, price, route.as_deref())
                .map_err(ApplicationError::from)
                .unwrap_or_else(|e| exit_with(&e, false));
            let board = board_for(
                &config,
                &adapters,
                session_for(token),
                Arc::new(TerminalMap::default()),
            );
            let trip_id = board
                .publish_trip(&new_trip)
                .await
                .unwrap_or_else(|e| exit_with(&e, true));
            println!("{trip_id}");
        },

        Commands::Config => {},
    }

    Ok(())
}

/// Copy the seat count and points into an open reservation
fn fill_reservation(
    flow: &application::ReservationFlow,
    seats: u32,
    points: &[String],
) -> Result<(), ApplicationError> {
    flow.set_requested_places(seats)?;
    for (index, point) in points.iter().enumerate() {
        if index > 0 && !flow.add_point()? {
            debug!(index, "Ignoring points beyond the seat count");
            break;
        }
        flow.set_point(index, point)?;
    }
    Ok(())
}
