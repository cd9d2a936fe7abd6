use config::builder::DefaultState;
use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use cycle_cancel_core::{Objective, QueueDiscipline, SolverOptions};
use log::warn;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use super::error::Error;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "EXECUTOR_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct ExecutorConfig {
    pub buffer_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SolverConfig {
    pub max_cancellations: usize,
    pub queue_discipline: String,
    pub objective: String,
}

impl SolverConfig {
    pub fn options(&self) -> Result<SolverOptions, Error> {
        let queue_discipline: QueueDiscipline = self
            .queue_discipline
            .parse()
            .map_err(Error::ConfigLoadError)?;

        Ok(SolverOptions {
            max_cancellations: self.max_cancellations,
            queue_discipline,
        })
    }

    pub fn objective(&self) -> Result<Objective, Error> {
        self.objective.parse().map_err(Error::ConfigLoadError)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    pub cases: usize,
    pub size: usize,
    pub max_cost: i64,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub executor: ExecutorConfig,
    pub solver: SolverConfig,
    pub simulator: SimulatorConfig,
}

fn default_config_path() -> Result<PathBuf, Error> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    Ok(base_path
        .join("crates")
        .join("executor")
        .join("Config.toml"))
}

/// Loads configuration from the default file location and environment variables.
pub fn load_config() -> Result<Config, Error> {
    load_config_from(&default_config_path()?)
}

/// Loads configuration from `path` (optional) layered over built-in defaults,
/// then overridden by `EXECUTOR__SECTION__KEY` environment variables.
pub fn load_config_from(path: &Path) -> Result<Config, Error> {
    if !path.exists() {
        warn!(
            "Configuration file not found at {}, using defaults.",
            path.display()
        );
    }

    let s = builder_with_defaults()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("EXECUTOR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    // Enum strings must parse before the pipeline starts.
    app_config.solver.options()?;
    app_config.solver.objective()?;
    if app_config.executor.buffer_size == 0 {
        return Err(Error::ConfigLoadError(
            "executor.buffer_size must be at least 1".to_string(),
        ));
    }

    Ok(app_config)
}

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = SolverOptions::default();

    ConfigLoader::builder()
        .set_default("executor.buffer_size", 16)?
        .set_default("solver.max_cancellations", defaults.max_cancellations as u64)?
        .set_default("solver.queue_discipline", "hybrid")?
        .set_default("solver.objective", "minimize")?
        .set_default("simulator.cases", 10)?
        .set_default("simulator.size", 8)?
        .set_default("simulator.max_cost", 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write config");
        file
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config_from(Path::new("definitely/not/here/Config.toml"))
            .expect("defaults should load");

        assert_eq!(config.executor.buffer_size, 16);
        assert_eq!(config.solver.max_cancellations, 1_000_000);
        assert_eq!(config.solver.options().unwrap(), SolverOptions::default());
        assert_eq!(config.solver.objective().unwrap(), Objective::Minimize);
        assert_eq!(config.simulator.seed, None);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            "[solver]\nqueue_discipline = \"fifo\"\nobjective = \"maximize\"\n\n[simulator]\nsize = 3\nseed = 7\n",
        );

        let config = load_config_from(file.path()).unwrap();

        assert_eq!(
            config.solver.options().unwrap().queue_discipline,
            QueueDiscipline::Fifo
        );
        assert_eq!(config.solver.objective().unwrap(), Objective::Maximize);
        assert_eq!(config.simulator.size, 3);
        assert_eq!(config.simulator.seed, Some(7));
        assert_eq!(config.simulator.cases, 10);
    }

    #[test]
    fn unknown_objective_is_rejected() {
        let file = write_config("[solver]\nobjective = \"sideways\"\n");

        let result = load_config_from(file.path());
        assert!(matches!(result, Err(Error::ConfigLoadError(_))));
    }

    #[test]
    fn zero_buffer_size_is_rejected() {
        let file = write_config("[executor]\nbuffer_size = 0\n");

        assert!(load_config_from(file.path()).is_err());
    }
}
