//! Error handling for Stompbox
//!
//! Stage-level problems inside a chain (unknown pedal names, parameter
//! mismatches) are recovered by the chain and reported as warnings. Everything
//! else surfaces here and terminates the call.

use thiserror::Error;

/// Result type alias for Stompbox operations
pub type Result<T> = std::result::Result<T, StompboxError>;

/// Main error type for Stompbox operations
#[derive(Error, Debug)]
pub enum StompboxError {
    // Audio I/O errors
    #[error("Failed to read audio file: {path}")]
    AudioReadError {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Failed to write audio file: {path}")]
    AudioWriteError {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Unsupported audio format: {details}")]
    UnsupportedFormat { details: String },

    // Impulse response errors
    #[error("Failed to load impulse response: {path}")]
    ImpulseResponseLoad {
        path: String,
        #[source]
        source: Box<StompboxError>,
    },

    #[error("Invalid impulse response {path}: {details}")]
    InvalidImpulseResponse { path: String, details: String },

    // Effect errors
    #[error("Unknown effect: {name}")]
    UnknownEffect { name: String },

    #[error("Parameter mismatch for {effect}: {source}")]
    ParameterMismatch {
        effect: String,
        #[source]
        source: ParamError,
    },

    // Generic I/O
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl StompboxError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AudioReadError { .. } => "AUDIO_READ",
            Self::AudioWriteError { .. } => "AUDIO_WRITE",
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::ImpulseResponseLoad { .. } => "IR_LOAD",
            Self::InvalidImpulseResponse { .. } => "IR_INVALID",
            Self::UnknownEffect { .. } => "UNKNOWN_EFFECT",
            Self::ParameterMismatch { .. } => "PARAMETER_MISMATCH",
            Self::IoError(_) => "IO_ERROR",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::AudioReadError { .. } => "Check that the file exists and is a valid WAV file",
            Self::AudioWriteError { .. } => "Check that the output directory exists and is writable",
            Self::UnsupportedFormat { .. } => "Convert to 16/24/32-bit PCM or 32-bit float WAV",
            Self::ImpulseResponseLoad { .. } | Self::InvalidImpulseResponse { .. } => {
                "Point ir_path at a readable, non-empty WAV impulse response \
                 (the default assets/impulse_responses/room.wav is not bundled)"
            }
            Self::UnknownEffect { .. } => {
                "Use one of: Compressor, Distortion, Overdrive, Equalizer, Tremolo, Chorus, Delay, Reverb"
            }
            Self::ParameterMismatch { .. } => "Run `stompbox-cli effects` to list accepted parameters",
            _ => "Check the error details and try again",
        }
    }
}

/// Problems with a single effect's parameter map
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("unexpected parameter '{name}' (accepted: {accepted})")]
    UnexpectedParameter { name: String, accepted: String },

    #[error("parameter '{name}' expects {expected}")]
    WrongType { name: String, expected: &'static str },
}
