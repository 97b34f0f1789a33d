use std::{
    fs::File,
    io::{Error, ErrorKind, Read},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::config::logger_config::LoggerConfig;

/// Input capability a cart declares in its metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Gamepad,
    Mouse,
}

/// Bridge configuration.
/// Please use [`BridgeConfigBuilder`] if you want to build it from code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// The only module whose foreign declarations are bound.
    pub(crate) module: String,
    /// Class instantiated after the cart loads.
    pub(crate) game_class: String,
    /// Palette color for engine `System.print` output.
    pub(crate) write_color: u8,
    pub(crate) input: InputMode,
    pub(crate) logger_config: Option<LoggerConfig>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            module: "main".to_string(),
            game_class: "Game".to_string(),
            write_color: 8,
            input: InputMode::Gamepad,
            logger_config: None,
        }
    }
}

impl BridgeConfig {
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn game_class(&self) -> &str {
        &self.game_class
    }

    pub fn write_color(&self) -> u8 {
        self.write_color
    }

    pub fn input(&self) -> InputMode {
        self.input
    }

    pub fn logger_config(&self) -> Option<&LoggerConfig> {
        self.logger_config.as_ref()
    }
}

/// `BridgeConfigBuilder` is a convenience builder to create a `BridgeConfig` from code.
#[derive(Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    pub fn new() -> Self {
        Self { config: Default::default() }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.config.module = module.into();
        self
    }

    pub fn with_game_class(mut self, game_class: impl Into<String>) -> Self {
        self.config.game_class = game_class.into();
        self
    }

    pub fn with_write_color(mut self, color: u8) -> Self {
        self.config.write_color = color;
        self
    }

    pub fn with_input(mut self, input: InputMode) -> Self {
        self.config.input = input;
        self
    }

    pub fn with_logger_config(mut self, logger_config: LoggerConfig) -> Self {
        self.config.logger_config = Some(logger_config);
        self
    }

    /// Retrieves the configuration built
    pub fn get(self) -> BridgeConfig {
        self.config
    }
}

pub struct BridgeConfigReader;

impl BridgeConfigReader {
    pub fn read_json(path: &Path) -> Result<BridgeConfig, Error> {
        if !path.exists() {
            return Err(Error::new(ErrorKind::NotFound, "File not found"));
        }
        let mut file = File::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let config = serde_json::from_slice(bytes.as_slice())?;
        Ok(config)
    }

    /// A missing file yields the defaults; a malformed one is still an error.
    pub fn read_or_default(path: &Path) -> Result<BridgeConfig, Error> {
        if !path.exists() {
            log::info!("no bridge configuration at {}, using defaults", path.display());
            return Ok(BridgeConfig::default());
        }
        Self::read_json(path)
    }
}
