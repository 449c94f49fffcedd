/// Result alias used across the crate.
pub type CardResult<T> = Result<T, CardError>;

/// A blocking, user-facing rejection.
///
/// The `Display` output is the exact message shown to the user. A rejection never mutates the
/// state of the step that produced it.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A required form field is empty.
    #[error("Please fill all fields.")]
    MissingField,
    /// No photo has been cropped and accepted.
    #[error("Please upload and crop your photo.")]
    MissingPhoto,
    /// Full name exceeds its maximum length.
    #[error("Full Name must be at most 30 letters.")]
    NameTooLong,
    /// District of birth exceeds its maximum length.
    #[error("District of Birth must be at most 15 letters.")]
    DistrictTooLong,
    /// Place of issue exceeds its maximum length.
    #[error("Place of Issue must be at most 15 letters.")]
    PlaceTooLong,
    /// Holder is younger than 18 years.
    #[error("User must be at least 18 years old.")]
    Underage,
    /// Signature surface is blank.
    #[error("Please draw your signature.")]
    BlankSignature,
    /// Crop acceptance was requested with no pending cropped image.
    #[error("Please select and crop your photo.")]
    CropNotSelected,
}

/// Crate-level error type.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Malformed input (bad date string, bad configuration value, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// A user action was blocked with a message.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// An image or font resource could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Drawing or readback failed.
    #[error("render error: {0}")]
    Render(String),

    /// Scene or configuration (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CardError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return the user-facing rejection, if this error is one.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(r) => Some(*r),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
