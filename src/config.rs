use crate::components::working_hours::ManagerConfig;
use crate::error::{config_error, env_error, AppResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default directory for stored schedules
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Optional settings file, relative to the working directory
pub const CONFIG_FILE: &str = "config/practice_hours.toml";

/// Main configuration structure for the editor
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one JSON file per doctor
    pub data_dir: PathBuf,
    /// Locale for messages and day names
    pub locale: String,
    /// Doctor to open when none is given on the command line
    pub default_doctor: Option<String>,
    /// Settings handed to the working hours manager
    pub manager: ManagerConfig,
}

/// Shape of the optional settings file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    locale: Option<String>,
    default_doctor: Option<String>,
    manager: ManagerConfig,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let file = Self::read_file(Path::new(CONFIG_FILE))?;
        let mut config = Self::from_file_config(file.unwrap_or_default());

        // Environment wins over the file
        if let Ok(data_dir) = env::var("PRACTICE_HOURS_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(locale) = env::var("PRACTICE_HOURS_LOCALE") {
            config.locale = locale;
        }
        if let Ok(doctor) = env::var("PRACTICE_HOURS_DOCTOR") {
            config.default_doctor = Some(doctor);
        }
        if let Ok(read_only) = env::var("PRACTICE_HOURS_READ_ONLY") {
            config.manager.disabled = parse_flag(&read_only)
                .ok_or_else(|| env_error("PRACTICE_HOURS_READ_ONLY"))?;
        }

        Ok(config)
    }

    /// Parse the settings file contents
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let file: FileConfig = toml::from_str(content)
            .map_err(|e| config_error(&format!("{}: {}", CONFIG_FILE, e)))?;
        Ok(Self::from_file_config(file))
    }

    fn read_file(path: &Path) -> AppResult<Option<FileConfig>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&content)
            .map(Some)
            .map_err(|e| config_error(&format!("{}: {}", path.display(), e)))
    }

    fn from_file_config(file: FileConfig) -> Self {
        Self {
            data_dir: file
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            locale: file.locale.unwrap_or_else(|| "en".to_string()),
            default_doctor: file.default_doctor,
            manager: file.manager,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file_config(FileConfig::default())
    }
}

/// Parse a boolean flag the way people write them in .env files
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::working_hours::{DayOfWeek, Draft};

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.locale, "en");
        assert!(config.default_doctor.is_none());
        assert!(!config.manager.disabled);
        assert_eq!(config.manager.default_draft, Draft::default());
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml(
            r#"
            data_dir = "/var/lib/practice-hours"
            locale = "fi"
            default_doctor = "Dr Virtanen"

            [manager]
            disabled = true

            [manager.default_draft]
            day = 2
            start = "08:00"
            end = "16:00"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/practice-hours"));
        assert_eq!(config.locale, "fi");
        assert_eq!(config.default_doctor.as_deref(), Some("Dr Virtanen"));
        assert!(config.manager.disabled);
        assert_eq!(
            config.manager.default_draft,
            Draft::new(DayOfWeek::Tuesday, "08:00", "16:00")
        );
    }

    #[test]
    fn test_partial_manager_table() {
        let config = Config::from_toml("[manager]\ndisabled = true\n").unwrap();
        assert!(config.manager.disabled);
        assert_eq!(config.manager.default_draft, Draft::default());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml("manager = 5"),
            Err(crate::error::Error::Config(_))
        ));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("yes"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
