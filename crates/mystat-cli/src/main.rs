//! MyStat CLI - prints the timetable and other portal data to the terminal.
//!
//! Credentials come from `MYSTAT_USERNAME` / `MYSTAT_PASSWORD` (a `.env`
//! file is honoured), the OS keychain, or an interactive prompt. The last
//! session is cached on disk so repeated runs skip the login call.

mod config;
mod render;

use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::Duration;
use mystat_core::auth::{CredentialStore, SessionStore};
use mystat_core::utils::today;
use mystat_core::{ApiClient, ApiError, ClientConfig, Credentials};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;

/// Number of month lessons shown after the month summary
const MONTH_PREVIEW_LESSONS: usize = 5;

/// Portal data a connected run prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Schedule,
    Month,
    News,
    Exams,
    Leaders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Show(View),
    Logout,
}

impl Command {
    fn parse(arg: Option<&str>) -> Result<Self> {
        match arg {
            None | Some("schedule") => Ok(Command::Show(View::Schedule)),
            Some("month") => Ok(Command::Show(View::Month)),
            Some("news") => Ok(Command::Show(View::News)),
            Some("exams") => Ok(Command::Show(View::Exams)),
            Some("leaders") => Ok(Command::Show(View::Leaders)),
            Some("logout") => Ok(Command::Logout),
            Some(other) => Err(anyhow::anyhow!(
                "Unknown command '{}'. Expected one of: schedule, month, news, exams, leaders, logout",
                other
            )),
        }
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match std::env::var("MYSTAT_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "mystat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(filter)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let arg = std::env::args().nth(1);
    let command = Command::parse(arg.as_deref())?;

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let view = match command {
        Command::Show(view) => view,
        Command::Logout => return logout(&mut config),
    };

    let credentials = resolve_credentials(&config)?;
    let store = SessionStore::new(Config::session_dir(credentials.username())?);
    let language = std::env::var("MYSTAT_LANGUAGE")
        .ok()
        .or_else(|| config.language.clone())
        .unwrap_or_else(|| mystat_core::config::DEFAULT_LANGUAGE.to_string());

    let mut client_config = ClientConfig::new(credentials.clone()).with_language(language.clone());
    match store.load(credentials.username()) {
        Ok(Some(session)) => {
            debug!(minutes_left = session.minutes_until_expiry(), "Reusing cached session");
            client_config = client_config.with_token(session.access_token, session.expires_at);
            if let Some(group_id) = session.group_id {
                client_config = client_config.with_group_id(group_id);
            }
        }
        Ok(None) => debug!("No cached session"),
        Err(e) => warn!(error = %e, "Failed to load cached session"),
    }

    let client = match ApiClient::connect(client_config).await {
        Ok(client) => client,
        Err(ApiError::Authentication(errors)) => {
            eprintln!("Login rejected:");
            for err in &errors {
                eprintln!("  {}: {}", err.field, err.message);
            }
            discard_session(&store);
            return Err(anyhow::anyhow!("Authentication failed"));
        }
        Err(e) => return Err(e).context("Failed to connect to MyStat"),
    };
    info!(username = credentials.username(), "Connected");

    if let Err(e) = CredentialStore::store(&credentials) {
        warn!(error = %e, "Failed to store credentials");
    }
    config.remember(credentials.username(), &language);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    let result = run(&client, view).await;

    if let Some(session) = client.session_snapshot().await {
        if let Err(e) = store.save(credentials.username(), &session) {
            warn!(error = %e, "Failed to save session");
        }
    }

    result
}

async fn run(client: &ApiClient, view: View) -> Result<()> {
    let today = today();
    match view {
        View::Schedule => {
            let tomorrow = today + Duration::days(1);
            let (today_lessons, tomorrow_lessons) = futures::join!(
                client.get_schedule_by_date(Some(today)),
                client.get_schedule_by_date(Some(tomorrow)),
            );
            println!("{}", render::schedule_table("Today", &today_lessons?));
            println!("{}", render::schedule_table("Tomorrow", &tomorrow_lessons?));
            print_month(client, today).await?;
        }
        View::Month => print_month(client, today).await?,
        View::News => {
            let news = client.get_latest_news().await?;
            println!("{}", render::news_table(&news));
        }
        View::Exams => {
            let (future, all) = futures::join!(client.get_future_exams(), client.get_all_exams());
            println!("{}", render::exam_table("Upcoming exams", &future?));
            println!("{}", render::exam_table("All exams", &all?));
        }
        View::Leaders => {
            let (group, stream) =
                futures::join!(client.get_group_leaders(), client.get_stream_leaders());
            println!("{}", render::leader_table("Group leaders", &group?));
            println!("{}", render::leader_table("Stream leaders", &stream?));
        }
    }
    Ok(())
}

async fn print_month(client: &ApiClient, today: chrono::NaiveDate) -> Result<()> {
    let month = client.get_month_schedule(Some(today)).await?;
    println!("\nLessons this month: {}", month.len());
    let preview = &month[..month.len().min(MONTH_PREVIEW_LESSONS)];
    println!("{}", render::schedule_table("First lessons of the month", preview));
    Ok(())
}

/// Drop a cached session after a rejected login. Returns whether it is gone.
fn discard_session(store: &SessionStore) -> bool {
    match store.clear() {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Failed to clear cached session");
            false
        }
    }
}

fn logout(config: &mut Config) -> Result<()> {
    if let Some(username) = config.last_username.take() {
        SessionStore::new(Config::session_dir(&username)?)
            .clear()
            .context("Failed to clear cached session")?;
        if let Err(e) = CredentialStore::delete(&username) {
            warn!(error = %e, "Failed to delete stored credentials");
        }
    }
    config.save()?;
    println!("Logged out");
    Ok(())
}

fn resolve_credentials(config: &Config) -> Result<Credentials> {
    let username = match std::env::var("MYSTAT_USERNAME").ok().or_else(|| config.last_username.clone()) {
        Some(username) if !username.is_empty() => username,
        _ => prompt_username()?,
    };

    if let Ok(password) = std::env::var("MYSTAT_PASSWORD") {
        return Ok(Credentials::new(username, password));
    }

    match CredentialStore::load(&username) {
        Ok(credentials) => Ok(credentials),
        Err(e) => {
            debug!(error = %e, "No stored password");
            let password = rpassword::prompt_password("Password: ")?;
            Ok(Credentials::new(username, password))
        }
    }
}

fn prompt_username() -> Result<String> {
    print!("Username: ");
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    Ok(username.trim().to_string())
}
