use std::path::PathBuf;

/// Environment variable that overrides the default data file.
pub const DATA_ENV_VAR: &str = "NFHS_DATA";

/// File looked up in the working directory when nothing else is given.
pub const DEFAULT_DATA_FILE: &str = "All India National Family Health Survey.csv";

/// Number of indicators pre-selected for the multi-indicator comparison.
pub const DEFAULT_INDICATOR_COUNT: usize = 3;

pub const WINDOW_SIZE: [f32; 2] = [1280.0, 820.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [800.0, 500.0];

/// Startup settings for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
}

impl DashboardConfig {
    /// Read the process arguments and environment.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::args().nth(1),
            std::env::var(DATA_ENV_VAR).ok(),
        )
    }

    /// Command-line path first, then the environment variable, then the default.
    pub fn resolve(arg: Option<String>, env: Option<String>) -> Self {
        let data_path = arg
            .into_iter()
            .chain(env)
            .find(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        Self { data_path }
    }
}
