use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum CmsBenchError {
    #[error("cms executable not found: {path}\nplease build the project first using 'make' or similar.")]
    ExecutableNotFound { path: PathBuf },

    #[error("cms executable is not executable: {path}\nplease run: chmod +x {path}")]
    ExecutableNotExecutable { path: PathBuf },

    #[error("data directory not found: {path}\nplease ensure test data files are available.")]
    DataDirNotFound { path: PathBuf },

    #[error("failed to write results to {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {detail}")]
    ConfigParse { path: PathBuf, detail: String },
}
