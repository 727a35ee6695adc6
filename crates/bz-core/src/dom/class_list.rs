//! CSS class toggling

use super::DomError;

/// An element's `classList`.
pub trait ClassList {
    /// Whether the class is present.
    fn has_class(&self, name: &str) -> bool;
    /// Add the class.
    fn add_class(&self, name: &str) -> Result<(), DomError>;
    /// Remove the class.
    fn remove_class(&self, name: &str) -> Result<(), DomError>;
}

/// Add `name` if absent, remove it if present. Returns whether it is now set.
pub fn toggle_class<E: ClassList>(element: &E, name: &str) -> Result<bool, DomError> {
    if element.has_class(name) {
        element.remove_class(name)?;
        Ok(false)
    } else {
        element.add_class(name)?;
        Ok(true)
    }
}
