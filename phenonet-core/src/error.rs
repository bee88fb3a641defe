/// Top-level Phenonet error type.
///
/// Operations that span several stages, such as opening a view straight
/// from the data directory, return [`Result<T>`](Result). The filter
/// components themselves are total and never fail.
#[derive(thiserror::Error, Debug)]
pub enum PhenonetError {
    /// Error while reading or parsing an input table.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A user-supplied threshold could not be interpreted.
    #[error("Threshold error: {0}")]
    Threshold(#[from] ThresholdError),

    /// A view could not be built from the loaded data.
    #[error("View error: {0}")]
    View(#[from] ViewError),
}

/// Errors while reading CSV tables and data files.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The table is not well-formed CSV.
    #[error("CSV syntax error at line {line}: {message}")]
    Syntax {
        /// 1-based line where the problem was detected.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A column required by the configured schema is absent from the header.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// No data file exists for the requested entity.
    #[error("Data file not found for {id} under {dir}")]
    DataFileNotFound {
        /// Entity whose file was requested.
        id: String,
        /// Directory that was searched.
        dir: String,
    },
}

/// Errors in Phenonet configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors interpreting threshold input.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ThresholdError {
    /// The p-value cutoff is neither a non-positive exponent nor a value in (0, 1].
    #[error("Invalid p-value cutoff: {0}")]
    PValue(String),

    /// The beta cutoff is not a number in [0, 1].
    #[error("Invalid beta cutoff: {0}")]
    Beta(String),

    /// The direction flag is not one of -1, 0, +1.
    #[error("Invalid direction: {0} (expected -1, 0 or 1)")]
    Direction(String),
}

/// Errors building a view over loaded data.
#[derive(thiserror::Error, Debug)]
pub enum ViewError {
    /// The overview edge list has no column for the selected weight.
    #[error("Missing weight column: {0}")]
    MissingColumn(String),

    /// The requested node does not exist in the loaded data.
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// The selection leaves no rows to build a graph from.
    #[error("No data found: {0}")]
    NoData(String),

    /// The anchor has no usable beta values for the selected ancestry.
    #[error("Ancestry {ancestry} has no data for {anchor}")]
    AncestryUnavailable {
        /// Ancestry label that was requested.
        ancestry: String,
        /// Anchor phenotype being inspected.
        anchor: String,
    },
}

/// Convenience alias for `Result<T, PhenonetError>`.
pub type Result<T> = std::result::Result<T, PhenonetError>;
