use thiserror::Error;

/// Errors raised when configuring or displaying a gauge.
///
/// The geometry itself never fails: bad values are rejected when a
/// configuration is validated, and everything downstream assumes a valid one.
#[derive(Debug, Error)]
pub enum GaugeError {
    #[error("value domain must be finite, got {min}..{max}")]
    NonFiniteDomain { min: f64, max: f64 },

    #[error("value domain is empty: min and max are both {0}")]
    EmptyDomain(f64),

    #[error("value domain is inverted: min {min} is greater than max {max}")]
    InvertedDomain { min: f64, max: f64 },

    #[error("minor tick interval must be a positive number, got {0}")]
    InvalidTickInterval(f64),

    #[error("gauge radius must be a positive number, got {0}")]
    InvalidRadius(f64),

    #[error("could not parse font data from {0}")]
    Font(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error(transparent)]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Pixels(#[from] pixels::Error),
}
