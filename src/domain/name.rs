//! Name validation for packages, projects and components
//!
//! A valid name is non-empty and contains no whitespace, control characters
//! or path separators. Names end up in generated file names, so anything a
//! generator would have to escape is rejected up front.

use super::error::DeclError;

/// Validates a name, returning it as an owned string
pub fn validate(name: &str) -> Result<String, DeclError> {
    if is_valid(name) {
        Ok(name.to_string())
    } else {
        Err(DeclError::InvalidName(name.to_string()))
    }
}

/// Returns true if `name` can identify a package, project or component
pub fn is_valid(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && c != '/' && c != '\\')
}
