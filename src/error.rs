//! Error types
//!
//! Invalid live parameter values never surface here: the parameter store
//! keeps the last valid value and reports a [`crate::params::ParamError`].
//! What remains are wiring and construction bugs, which should fail loudly.

/// Errors raised while building or driving an asteroid
#[derive(Debug, thiserror::Error)]
pub enum AsteroidError {
    /// A parameter snapshot violates a bound invariant
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: &'static str,
    },

    /// An operation ran before the collaborator it needs was constructed
    #[error("missing collaborator: {0} has not been constructed")]
    MissingCollaborator(&'static str),

    /// Palette has no colors to pick from
    #[error("color palette is empty")]
    EmptyPalette,

    /// Shape library has no templates to pick from
    #[error("shape library is empty")]
    EmptyShapeLibrary,

    /// A parameter preset file could not be read
    #[error("failed to read preset: {0}")]
    PresetRead(#[source] std::io::Error),

    /// A parameter preset could not be parsed or written
    #[error("parameter preset: {0}")]
    Preset(#[from] serde_json::Error),
}

/// Convenience alias
pub type Result<T> = std::result::Result<T, AsteroidError>;
