use std::fs::File;
use std::io::{BufReader, Error as IOError, Read};
use std::str::FromStr;

use serde_json::{error::Error as SerdeError, Value};
use thiserror::Error;

use super::resources;

#[derive(Error, Debug)]
pub enum ConfigErr {
  #[error("{self:?}")]
  IOError(#[from] IOError),
  #[error("{self:?}")]
  SerdeError(#[from] SerdeError),
  #[error("`{0}` has invalid value {1}")]
  InvalidValueErr(String, String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
  Tsv,
  Json,
}

impl FromStr for OutputFormat {
  type Err = ConfigErr;
  fn from_str(key: &str) -> Result<Self, Self::Err> {
    match key {
      "tsv" => Ok(OutputFormat::Tsv),
      "json" => Ok(OutputFormat::Json),
      _ => Err(ConfigErr::InvalidValueErr(
        String::from("outputFormat"),
        key.to_string(),
      )),
    }
  }
}

/// Settings for the `cedict` command, read from a JSON file.
#[derive(Debug)]
pub struct Config {
  pub settings: Value,
}

impl Config {
  pub fn empty() -> Result<Config, ConfigErr> {
    Ok(Config {
      settings: serde_json::from_str(resources::CEDICT_JSON)?,
    })
  }
  /// Loads the settings file at `path`, or the built-in defaults when no
  /// path is given. Keys missing from the file keep their default value.
  pub fn setup(path: Option<&str>) -> Result<Config, ConfigErr> {
    let mut config = Config::empty()?;
    if let Some(path) = path {
      let mut buf = String::new();
      BufReader::new(File::open(path)?).read_to_string(&mut buf)?;
      config.merge(serde_json::from_str(&buf)?);
    }
    Ok(config)
  }
  fn merge(&mut self, settings: Value) {
    if let (Value::Object(base), Value::Object(overrides)) = (&mut self.settings, settings) {
      for (key, value) in overrides {
        base.insert(key, value);
      }
    }
  }
  pub fn output_format(&self) -> Result<OutputFormat, ConfigErr> {
    match self.settings.get("outputFormat") {
      Some(Value::String(s)) => s.parse(),
      Some(v) => Err(ConfigErr::InvalidValueErr(
        String::from("outputFormat"),
        v.to_string(),
      )),
      None => Ok(OutputFormat::Tsv),
    }
  }
  pub fn print_all(&self) -> Result<bool, ConfigErr> {
    self.get_bool("printAll")
  }
  pub fn skip_invalid_lines(&self) -> Result<bool, ConfigErr> {
    self.get_bool("skipInvalidLines")
  }
  fn get_bool(&self, key: &str) -> Result<bool, ConfigErr> {
    match self.settings.get(key) {
      Some(Value::Bool(b)) => Ok(*b),
      Some(v) => Err(ConfigErr::InvalidValueErr(key.to_string(), v.to_string())),
      None => Ok(false),
    }
  }
}
