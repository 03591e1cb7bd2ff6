use crate::shutdown;
use practice_hours::commands::{respond, EditorSession};
use practice_hours::config::Config;
use practice_hours::db::{JsonFileDb, ScheduleDb};
use practice_hours::error::{config_error, other_error, AppResult, Error};
use practice_hours::utils::{i18n, input};
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, Stdout};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        // Keep stdout for the editor itself
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the configuration and apply its locale
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => {
            i18n::set_locale(&config.locale);
            info!("Using locale {}", config.locale);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Doctor named on the command line, or the configured default
pub fn doctor_from_args(config: &Config) -> miette::Result<String> {
    std::env::args()
        .nth(1)
        .or_else(|| config.default_doctor.clone())
        .ok_or_else(|| {
            config_error("No doctor given. Pass a name or set PRACTICE_HOURS_DOCTOR").into()
        })
}

/// Open the doctor's working hours and run the editor until quit, EOF or a signal
pub async fn run_editor(config: Config, doctor: &str) -> miette::Result<()> {
    info!("Opening schedules in {}", config.data_dir.display());
    let db: Arc<dyn ScheduleDb> = Arc::new(JsonFileDb::new(config.data_dir.clone()));

    let mut session = EditorSession::open(doctor, db, config.manager.clone()).await?;

    let mut stdout = tokio::io::stdout();
    write_lines(&mut stdout, &session.banner()).await?;

    let mut lines = input::stdin_lines();

    let signal = shutdown::wait_for_signal();
    tokio::pin!(signal);
    let mut signals_active = true;

    loop {
        stdout.write_all(b"> ").await.map_err(Error::from)?;
        stdout.flush().await.map_err(Error::from)?;

        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line.transpose().map_err(Error::from)? else {
                    info!("End of input, leaving editor");
                    break;
                };

                let reply = respond(&mut session, &line).await;
                write_lines(&mut stdout, &reply.lines).await?;
                if reply.quit {
                    break;
                }
            }
            result = &mut signal, if signals_active => {
                match result {
                    Ok(()) => {
                        if session.is_dirty() {
                            info!("Leaving editor without saving changes for {}", session.doctor());
                        }
                        break;
                    }
                    Err(e) => {
                        error!("Failed to install signal handlers: {}", e);
                        signals_active = false;
                    }
                }
            }
        }
    }

    info!("Editor closed");
    Ok(())
}

async fn write_lines(stdout: &mut Stdout, lines: &[String]) -> AppResult<()> {
    for line in lines {
        stdout.write_all(line.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}
