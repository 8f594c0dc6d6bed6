use crate::errors::ConfigurationError;
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::env::var;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use url::Url;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: Application,
    pub session: SessionSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Application {
    pub api_base_url: String,
    pub login_url: String,
}

impl Application {
    pub fn base_url(&self) -> Result<Url, ConfigurationError> {
        Url::parse(&self.api_base_url).map_err(ConfigurationError::InvalidBaseUrl)
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SessionSettings {
    #[serde_as(as = "DisplayFromStr")]
    pub store_type: SessionStoreType,
    pub file_path: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum SessionStoreType {
    #[default]
    InMemory,
    File,
}

impl Display for SessionStoreType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStoreType::InMemory => write!(f, "in_memory"),
            SessionStoreType::File => write!(f, "file"),
        }
    }
}

impl FromStr for SessionStoreType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(SessionStoreType::File),
            "in_memory" => Ok(SessionStoreType::InMemory),
            &_ => Err(ConfigurationError::UnknownSessionStoreType),
        }
    }
}

impl SessionSettings {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn check_if_valid(&self) -> Result<(), ConfigurationError> {
        if self.store_type == SessionStoreType::File {
            match &self.file_path {
                Some(path) if !path.trim().is_empty() => {}
                _ => return Err(ConfigurationError::MissingSessionFile),
            }
        }
        Ok(())
    }
}

/// Which `configuration/<name>.yaml` overlay applies, picked by `APP_ENVIRONMENT`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    pub fn overlay_file(self) -> String {
        format!("configuration/{self}")
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Dev => write!(f, "dev"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(ConfigurationError::UnknownEnvironment(format!(
                "`{other}` is not a known environment, expected `dev` or `prod`"
            ))),
        }
    }
}

pub fn get_env() -> Result<Environment, ConfigurationError> {
    match var("APP_ENVIRONMENT") {
        Ok(name) => name.parse(),
        Err(_) => Ok(Environment::default()),
    }
}

pub fn get_configuration() -> Result<Settings, ConfigurationError> {
    let environment = get_env()?;
    let second_source = environment.overlay_file();
    let settings = Config::builder()
        .add_source(config::File::new("configuration/base", FileFormat::Yaml))
        .add_source(config::File::new(&second_source, FileFormat::Yaml).required(false))
        .add_source(config::Environment::with_prefix("TRACKER").separator("__"))
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.session.check_if_valid()?;
    Ok(settings)
}
