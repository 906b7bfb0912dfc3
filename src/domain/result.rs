//! Result type alias for nerscrub

use super::errors::NerScrubError;

/// Result type alias for nerscrub operations
///
/// # Examples
///
/// ```
/// use nerscrub::domain::result::Result;
/// use nerscrub::domain::errors::NerScrubError;
///
/// fn failing_function() -> Result<()> {
///     Err(NerScrubError::Validation("Invalid input".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, NerScrubError>;
