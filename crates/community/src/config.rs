use anyhow::anyhow;
use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::{Read, Write},
    path::PathBuf,
};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to Settings.toml file holding configuration options
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level to run with the service (default: info)
    #[arg(short, long)]
    pub level: Option<String>,

    /// Base url of the giveaway backend, overrides the value in the config file
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Settings {
    pub config: Option<String>,
    pub level: Option<String>,
    pub api_settings: APISettings,
    pub backend_settings: BackendSettings,
    pub ui_settings: UISettings,
    pub session_settings: SessionSettings,
}

impl ConfigurableSettings for Settings {
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings) {
        if let Some(level) = &cli_settings.level {
            self.level = Some(level.clone());
        }
        if let Some(backend_url) = &cli_settings.backend_url {
            self.backend_settings.base_url = backend_url.clone();
        }
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/local.toml")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct APISettings {
    pub domain: String,
    pub port: String,
    pub origins: Vec<String>,
}

impl Default for APISettings {
    fn default() -> Self {
        APISettings {
            domain: String::from("127.0.0.1"),
            port: String::from("9990"),
            origins: vec![String::from("http://localhost:9990")],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Url of the giveaway backend, every `/api/...` path is joined onto it
    pub base_url: String,
    /// Interval in seconds between giveaway list refreshes
    pub poll_interval_secs: u64,
    /// Serve giveaways from an in-memory backend instead of `base_url`
    /// (only honored by debug builds or with the e2e-testing feature)
    #[serde(default)]
    pub mock_enabled: bool,
    /// Password the in-memory backend accepts
    #[serde(default = "default_mock_admin_password")]
    pub mock_admin_password: String,
}

fn default_mock_admin_password() -> String {
    String::from("admin")
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            base_url: String::from("http://127.0.0.1:8001"),
            poll_interval_secs: 30,
            mock_enabled: false,
            mock_admin_password: default_mock_admin_password(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UISettings {
    pub site_name: String,
    pub discord_url: String,
    pub logo_url: String,
    pub hero_image_url: String,
    pub ui_dir: String,
}

impl Default for UISettings {
    fn default() -> Self {
        UISettings {
            site_name: String::from("RBC Community"),
            discord_url: String::from("https://discord.gg/letsgo"),
            logo_url: String::from("https://images.pexels.com/photos/792381/pexels-photo-792381.jpeg"),
            hero_image_url: String::from(
                "https://images.unsplash.com/photo-1615963244664-5b845b2025ee?crop=entropy&cs=srgb&fm=jpg&q=85",
            ),
            ui_dir: String::from("./crates/community/ui"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSettings {
    pub cookie_name: String,
    /// Sessions untouched for this many seconds are dropped
    pub idle_ttl_secs: u64,
    /// Seconds between sweeps for idle sessions
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_sweep_interval_secs() -> u64 {
    300
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            cookie_name: String::from("community_session"),
            idle_ttl_secs: 60 * 60 * 12,
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

pub fn get_settings() -> Result<Settings, anyhow::Error> {
    get_settings_with_cli(Cli::parse().into())
}

pub struct CliSettings {
    pub config: Option<String>,
    pub level: Option<String>,
    pub backend_url: Option<String>,
}

impl From<Cli> for CliSettings {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            level: cli.level,
            backend_url: cli.backend_url,
        }
    }
}

pub trait ConfigurableSettings: Serialize + for<'de> Deserialize<'de> + Default {
    /// Apply CLI settings after loading from file
    fn apply_cli_overrides(&mut self, cli_settings: &CliSettings);

    /// Get the default config file path
    fn default_config_path() -> PathBuf {
        PathBuf::from("./config/settings.toml")
    }

    /// Get the config directory path
    fn config_directory() -> PathBuf {
        PathBuf::from("./config")
    }
}

pub fn get_settings_with_cli<T: ConfigurableSettings>(
    cli_settings: CliSettings,
) -> Result<T, anyhow::Error> {
    let mut settings = if let Some(config_path) = cli_settings.config.clone() {
        let path = PathBuf::from(config_path);

        let absolute_path = if path.is_absolute() {
            path
        } else {
            env::current_dir()?.join(path)
        };

        match File::open(absolute_path) {
            Ok(mut file) => {
                let mut content = String::new();
                file.read_to_string(&mut content)
                    .map_err(|e| anyhow!("Failed to read config: {}", e))?;
                toml::from_str(&content)
                    .map_err(|e| anyhow!("Failed to map config to settings: {}", e))?
            }
            Err(err) => return Err(anyhow!("Failed to find file: {}", err)),
        }
    } else {
        let default_path = T::default_config_path();
        match File::open(&default_path) {
            Ok(mut file) => {
                let mut content = String::new();
                file.read_to_string(&mut content)
                    .map_err(|e| anyhow!("Failed to read default config: {}", e))?;
                toml::from_str(&content)
                    .map_err(|e| anyhow!("Failed to parse default config: {}", e))?
            }
            Err(_) => {
                let default_settings = T::default();

                fs::create_dir_all(T::config_directory())
                    .map_err(|e| anyhow!("Failed to create config directory: {}", e))?;

                let toml_content = toml::to_string(&default_settings)
                    .map_err(|e| anyhow!("Failed to serialize default settings: {}", e))?;

                let mut file = fs::File::create(&default_path)
                    .map_err(|e| anyhow!("Failed to create config file: {}", e))?;
                file.write_all(toml_content.as_bytes())
                    .map_err(|e| anyhow!("Failed to write default config: {}", e))?;

                default_settings
            }
        }
    };

    settings.apply_cli_overrides(&cli_settings);

    Ok(settings)
}

pub fn setup_logger(
    level: Option<String>,
    filter_targets: Vec<String>,
) -> Result<(), fern::InitError> {
    let rust_log = get_log_level(level);
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .level(rust_log)
        .filter(move |metadata| {
            !filter_targets
                .iter()
                .any(|filter| metadata.target().starts_with(filter))
        })
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

pub fn get_log_level(level: Option<String>) -> LevelFilter {
    let level = level.unwrap_or_else(|| env::var("RUST_LOG").unwrap_or_default());
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}
