use std::{
    borrow::Cow,
    fmt, io,
    path::{Path, PathBuf},
};

use config::builder::{ConfigBuilder, DefaultState};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::environment::Environment;
use crate::shared::{ValidationError, parse_bool_flag};

/// Directory containing configuration files relative to the working directory.
const CONFIGURATION_DIR: &str = "configuration";

/// Optional dotenv file read from the working directory.
const DOTENV_FILE: &str = ".env";

/// Supported extensions for base and environment configuration files.
const CONFIG_FILE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Prefix for environment variable configuration overrides.
const ENV_PREFIX: &str = "APP";

/// Separator between environment variable prefix and key segments.
const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator for nested configuration keys in environment variables.
const ENV_SEPARATOR: &str = "__";

/// How the value of a [`VariableOverride`] is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKind {
    /// The raw string is used as is.
    Text,
    /// The string is parsed with [`parse_bool_flag`].
    Flag,
}

/// Maps a plain environment variable (such as `PGHOST`) onto a configuration key.
#[derive(Debug, Clone, Copy)]
pub struct VariableOverride {
    pub variable: &'static str,
    pub key: &'static str,
    pub kind: OverrideKind,
}

/// Trait implemented by configuration structures loaded through [`load_config`].
pub trait Config {
    /// Plain environment variables applied last, on top of every other source.
    ///
    /// Unset or empty variables leave the key untouched.
    const VARIABLE_OVERRIDES: &'static [VariableOverride];
}

/// Identifies which configuration file is currently being loaded.
#[derive(Debug, Clone, Copy)]
enum ConfigFileKind {
    Base,
    Environment(Environment),
}

impl ConfigFileKind {
    fn stem(&self) -> Cow<'static, str> {
        match self {
            ConfigFileKind::Base => Cow::Borrowed("base"),
            ConfigFileKind::Environment(env) => Cow::Borrowed(env.as_str()),
        }
    }
}

impl fmt::Display for ConfigFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFileKind::Base => f.write_str("base configuration"),
            ConfigFileKind::Environment(env) => write!(f, "{env} environment configuration"),
        }
    }
}

/// Errors that can occur while loading configuration files and overrides.
#[derive(Debug, Error)]
pub enum LoadConfigError {
    /// Failed to determine the current working directory.
    #[error("failed to determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// A configuration file existed but could not be parsed.
    #[error("failed to load {kind_description} from `{path}`: {source}")]
    ConfigurationFileLoad {
        kind_description: String,
        path: PathBuf,
        source: config::ConfigError,
    },

    /// The dotenv file exists but could not be read or parsed.
    #[error("failed to read dotenv file `{path}`: {source}")]
    DotenvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },

    /// A plain environment variable could not be applied as an override.
    #[error("failed to apply environment variable `{variable}`: {source}")]
    VariableOverride {
        variable: &'static str,
        source: config::ConfigError,
    },

    /// A plain environment variable holds a value that cannot be interpreted.
    #[error("invalid environment variable: {0}")]
    InvalidVariable(#[source] ValidationError),

    /// The configuration sources were parsed but deserialization failed.
    #[error("failed to deserialize configuration: {0}")]
    Deserialization(#[source] config::ConfigError),

    /// Failed to determine the runtime environment (`APP_ENVIRONMENT`).
    #[error("failed to determine runtime environment: {0}")]
    Environment(#[from] io::Error),

    /// Failed to build the merged configuration.
    #[error("failed to initialize configuration builder: {0}")]
    Builder(#[source] config::ConfigError),
}

/// Loads configuration for the current process.
///
/// Reads `configuration/base.(yaml|yml|json)` and `configuration/{environment}.(yaml|yml|json)`
/// when present, then `APP_`-prefixed environment variables (nested keys use double
/// underscores, as in `APP_SOURCE__PATH`), then the type's [`Config::VARIABLE_OVERRIDES`].
/// Missing files are not an error, so a bare environment is a valid configuration.
///
/// Variables may also come from a `.env` file in the working directory. Process variables
/// take precedence over the file.
pub fn load_config<T>() -> Result<T, LoadConfigError>
where
    T: Config + DeserializeOwned,
{
    let base_path = std::env::current_dir().map_err(LoadConfigError::CurrentDir)?;
    let environment = Environment::load()?;
    let variables = collect_variables(&base_path.join(DOTENV_FILE), std::env::vars())?;

    load_config_from(&base_path.join(CONFIGURATION_DIR), environment, &variables)
}

/// Loads configuration from an explicit directory and variable snapshot.
///
/// Same layering as [`load_config`] but without touching the process environment.
pub fn load_config_from<T>(
    configuration_directory: &Path,
    environment: Environment,
    variables: &config::Map<String, String>,
) -> Result<T, LoadConfigError>
where
    T: Config + DeserializeOwned,
{
    let mut builder = config::Config::builder();

    for kind in [ConfigFileKind::Base, ConfigFileKind::Environment(environment)] {
        if let Some(path) = find_configuration_file(configuration_directory, kind) {
            builder = builder.add_source(config::File::from(path.clone()));
            validate_configuration_source(&builder, kind, &path)?;
        }
    }

    let environment_source = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_PREFIX_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .source(Some(variables.clone()));

    builder = builder.add_source(environment_source);
    builder = apply_variable_overrides(builder, T::VARIABLE_OVERRIDES, variables)?;

    let settings = builder.build().map_err(LoadConfigError::Builder)?;

    settings
        .try_deserialize::<T>()
        .map_err(LoadConfigError::Deserialization)
}

/// Reads `KEY=value` pairs from a dotenv file.
///
/// A missing file yields no variables.
pub fn read_dotenv_file(path: &Path) -> Result<config::Map<String, String>, LoadConfigError> {
    let dotenv_error = |source: dotenvy::Error| LoadConfigError::DotenvFile {
        path: path.to_path_buf(),
        source,
    };

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(err) if err.not_found() => return Ok(config::Map::new()),
        Err(err) => return Err(dotenv_error(err)),
    };

    entries
        .map(|entry| entry.map_err(dotenv_error))
        .collect()
}

/// Merges dotenv variables with `process` variables, the latter winning on conflicts.
fn collect_variables(
    dotenv_path: &Path,
    process: impl IntoIterator<Item = (String, String)>,
) -> Result<config::Map<String, String>, LoadConfigError> {
    let mut variables = read_dotenv_file(dotenv_path)?;
    variables.extend(process);

    Ok(variables)
}

fn apply_variable_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    overrides: &[VariableOverride],
    variables: &config::Map<String, String>,
) -> Result<ConfigBuilder<DefaultState>, LoadConfigError> {
    for variable_override in overrides {
        let Some(value) = variables
            .get(variable_override.variable)
            .filter(|value| !value.is_empty())
        else {
            continue;
        };

        let result = match variable_override.kind {
            OverrideKind::Text => builder.set_override(variable_override.key, value.as_str()),
            OverrideKind::Flag => {
                let flag = parse_bool_flag(variable_override.variable, value)
                    .map_err(LoadConfigError::InvalidVariable)?;
                builder.set_override(variable_override.key, flag)
            }
        };

        builder = result.map_err(|source| LoadConfigError::VariableOverride {
            variable: variable_override.variable,
            source,
        })?;
    }

    Ok(builder)
}

/// Finds the configuration file that matches the requested kind and supported extensions.
fn find_configuration_file(directory: &Path, kind: ConfigFileKind) -> Option<PathBuf> {
    let stem = kind.stem();

    CONFIG_FILE_EXTENSIONS
        .iter()
        .map(|extension| directory.join(format!("{stem}.{extension}")))
        .find(|path| path.is_file())
}

fn validate_configuration_source(
    builder: &ConfigBuilder<DefaultState>,
    kind: ConfigFileKind,
    path: &Path,
) -> Result<(), LoadConfigError> {
    builder
        .clone()
        .build()
        .map_err(|source| LoadConfigError::ConfigurationFileLoad {
            kind_description: kind.to_string(),
            path: path.to_path_buf(),
            source,
        })
        .map(|_| ())
}
