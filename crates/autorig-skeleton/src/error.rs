//! Error types for skeleton editing and rig synthesis.

use std::path::PathBuf;

use thiserror::Error;

use crate::expression::ExpressionError;

/// Result type for skeleton and synthesis operations.
pub type RigResult<T> = Result<T, RigError>;

/// Coarse error taxonomy reported to callers.
///
/// Every category is fatal for the synthesis call that raised it; earlier
/// calls in the same batch keep whatever they already committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A required entity is missing or has the wrong shape.
    Precondition,
    /// Bone geometry does not define a direction or plane.
    DegenerateGeometry,
    /// A rename would merge two bone identities.
    NameCollision,
    /// Reading or writing a skeleton document failed.
    Io,
}

impl ErrorCategory {
    /// Returns the category name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Precondition => "precondition",
            ErrorCategory::DegenerateGeometry => "degenerate_geometry",
            ErrorCategory::NameCollision => "name_collision",
            ErrorCategory::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised by the skeleton graph and the synthesizers.
#[derive(Debug, Error)]
pub enum RigError {
    /// A bone required by the operation does not exist.
    #[error("missing bone '{name}'")]
    MissingBone { name: String },

    /// A bone with this name already exists.
    #[error("bone '{name}' already exists")]
    DuplicateBone { name: String },

    /// A bone names a parent that does not exist.
    #[error("bone '{bone}' names unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },

    /// Re-parenting would make a bone its own ancestor.
    #[error("parenting '{bone}' under '{parent}' would create a cycle")]
    ParentCycle { bone: String, parent: String },

    /// A constraint with this name exists but has another type.
    #[error("constraint '{name}' on bone '{bone}' is {found}, expected {expected}")]
    ConstraintTypeMismatch {
        bone: String,
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A bone carries two constraints with one name, or two drivers on one channel.
    #[error("bone '{bone}' has more than one binding for '{key}'")]
    DuplicateBinding { bone: String, key: String },

    /// A loaded value lies outside its allowed range.
    #[error("bone '{bone}' has out-of-range {field}: {message}")]
    OutOfRange {
        bone: String,
        field: String,
        message: String,
    },

    /// A bone name pattern failed to compile.
    #[error("invalid bone name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A configuration value is out of range.
    #[error("invalid config field '{field}': {message}")]
    InvalidConfig { field: &'static str, message: String },

    /// Geometry is degenerate (zero-length or parallel vectors).
    #[error("degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// Renaming would produce a name already taken by another bone.
    #[error("renaming '{from}' to '{to}' collides with an existing bone")]
    NameCollision { from: String, to: String },

    /// A driver expression failed to parse or evaluate.
    #[error("driver expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// The skin weight collaborator rejected a transfer.
    #[error("skin weight transfer from '{source_bone}' failed: {message}")]
    SkinWeight { source_bone: String, message: String },

    /// JSON parse or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or write a skeleton document.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RigError {
    /// Creates a missing bone error.
    pub fn missing(name: impl Into<String>) -> Self {
        RigError::MissingBone { name: name.into() }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        RigError::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// Returns the taxonomy category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RigError::DegenerateGeometry { .. } => ErrorCategory::DegenerateGeometry,
            RigError::NameCollision { .. } => ErrorCategory::NameCollision,
            RigError::Json(_) | RigError::Io { .. } => ErrorCategory::Io,
            RigError::MissingBone { .. }
            | RigError::DuplicateBone { .. }
            | RigError::UnknownParent { .. }
            | RigError::ParentCycle { .. }
            | RigError::ConstraintTypeMismatch { .. }
            | RigError::DuplicateBinding { .. }
            | RigError::OutOfRange { .. }
            | RigError::InvalidPattern(_)
            | RigError::InvalidConfig { .. }
            | RigError::Expression(_)
            | RigError::SkinWeight { .. } => ErrorCategory::Precondition,
        }
    }

    /// Returns a stable error code (e.g., "RIG_001").
    pub fn code(&self) -> &'static str {
        match self {
            RigError::MissingBone { .. } => "RIG_001",
            RigError::DuplicateBone { .. } => "RIG_002",
            RigError::UnknownParent { .. } => "RIG_003",
            RigError::ParentCycle { .. } => "RIG_004",
            RigError::ConstraintTypeMismatch { .. } => "RIG_005",
            RigError::InvalidPattern(_) => "RIG_006",
            RigError::InvalidConfig { .. } => "RIG_007",
            RigError::DuplicateBinding { .. } => "RIG_008",
            RigError::OutOfRange { .. } => "RIG_009",
            RigError::DegenerateGeometry { .. } => "RIG_010",
            RigError::NameCollision { .. } => "RIG_020",
            RigError::Expression(_) => "RIG_030",
            RigError::SkinWeight { .. } => "RIG_031",
            RigError::Json(_) => "RIG_040",
            RigError::Io { .. } => "RIG_041",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            RigError::missing("Hand_L").category(),
            ErrorCategory::Precondition
        );
        assert_eq!(
            RigError::degenerate("parallel").category(),
            ErrorCategory::DegenerateGeometry
        );
        let collision = RigError::NameCollision {
            from: "J_Bip_L_Hand".into(),
            to: "Hand_L".into(),
        };
        assert_eq!(collision.category(), ErrorCategory::NameCollision);
        assert_eq!(collision.code(), "RIG_020");
    }

    #[test]
    fn test_display() {
        let err = RigError::missing("Thumb1_L");
        assert_eq!(err.to_string(), "missing bone 'Thumb1_L'");
        assert_eq!(ErrorCategory::DegenerateGeometry.to_string(), "degenerate_geometry");
    }
}
