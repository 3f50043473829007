use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum DoDocError {
    #[error("{0}")]
    Error(String),
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Lookup curve '{name}' has no points")]
    EmptyCurve { name: String },
    #[error("Lookup curve '{name}' is not strictly increasing at point {index}")]
    NonMonotonicCurve { name: String, index: usize },
    #[error("Negative area for {what}: {value} m2")]
    NegativeArea { what: String, value: f64 },
    #[error("DODOC model at {location} has a modelled area of {modelled_area} m2 that has exceeded the Max Area of {max_area} m2.")]
    MaxAreaExceeded {
        location: String,
        modelled_area: f64,
        max_area: f64,
    },
}

/// Convenience type for `Result<T, DoDocError>`.
pub type DoDocResult<T> = Result<T, DoDocError>;
