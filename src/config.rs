use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::CmsBenchError;

pub const DEFAULT_EXECUTABLE: &str = "./build/main";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_OUTPUT: &str = "perf-results.csv";
pub const DEFAULT_DATASET_SIZES: [u64; 3] = [100, 500, 1000];
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Immutable run configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub executable: PathBuf,
    pub data_dir: PathBuf,
    pub output: PathBuf,
    pub dataset_sizes: Vec<u64>,
    pub timeout_secs: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            dataset_sizes: DEFAULT_DATASET_SIZES.to_vec(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Optional TOML config file. Any omitted key falls through to the
/// command-line value or the built-in default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub executable: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub sizes: Option<Vec<u64>>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, CmsBenchError> {
        let text = std::fs::read_to_string(path).map_err(|source| CmsBenchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| CmsBenchError::ConfigParse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

/// Values given explicitly on the command line; `None` means "not given".
#[derive(Debug, Default)]
pub struct Overrides {
    pub executable: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub sizes: Option<Vec<u64>>,
    pub timeout_secs: Option<u64>,
}

/// Merge configuration layers: CLI flags beat the config file, which
/// beats the built-in defaults.
pub fn resolve(cli: Overrides, file: FileConfig) -> BenchConfig {
    let defaults = BenchConfig::default();
    BenchConfig {
        executable: cli
            .executable
            .or(file.executable)
            .unwrap_or(defaults.executable),
        data_dir: cli.data_dir.or(file.data_dir).unwrap_or(defaults.data_dir),
        output: cli.output.or(file.output).unwrap_or(defaults.output),
        dataset_sizes: cli.sizes.or(file.sizes).unwrap_or(defaults.dataset_sizes),
        timeout_secs: cli
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(defaults.timeout_secs),
    }
}
