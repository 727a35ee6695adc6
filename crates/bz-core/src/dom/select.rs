//! `<select>` control helpers

use super::DomError;

/// An `<option>` element.
pub trait SelectOption {
    /// `value`
    fn value(&self) -> String;
    /// Text content
    fn text(&self) -> String;
    /// Current selectedness
    fn is_selected(&self) -> bool;
    /// Whether the markup carries a `selected` attribute
    fn has_selected_attribute(&self) -> bool;
}

/// A `<select>` element.
pub trait SelectControl {
    /// Option element type
    type OptionElement: SelectOption;

    /// Options in document order.
    fn options(&self) -> Vec<Self::OptionElement>;

    /// Index of the first selected option.
    fn selected_index(&self) -> Option<usize>;

    /// Whether this is a multi-select.
    fn is_multiple(&self) -> bool;

    /// Host-provided `selectedOptions`, when the host has it.
    fn native_selected_options(&self) -> Option<Vec<Self::OptionElement>> {
        None
    }

    /// Create a detached option.
    fn new_option(&self, text: &str, value: &str) -> Result<Self::OptionElement, DomError>;

    /// Append an option at the end.
    fn append_option(&self, option: &Self::OptionElement) -> Result<(), DomError>;

    /// Remove the option at `index`.
    fn remove_option(&self, index: usize) -> Result<(), DomError>;

    /// Number of options.
    fn option_count(&self) -> usize {
        self.options().len()
    }
}

/// Append a new option with the given label and value.
pub fn create_option<S: SelectControl>(
    select: &S,
    text: &str,
    value: &str,
) -> Result<S::OptionElement, DomError> {
    let option = select.new_option(text, value)?;
    select.append_option(&option)?;
    Ok(option)
}

/// Remove every option.
pub fn clear_options<S: SelectControl>(select: &S) -> Result<(), DomError> {
    for _ in 0..select.option_count() {
        select.remove_option(0)?;
    }
    Ok(())
}

/// Replace the options with `(value, text)` pairs.
pub fn populate_from_pairs<S, V, T>(select: &S, pairs: &[(V, T)]) -> Result<(), DomError>
where
    S: SelectControl,
    V: AsRef<str>,
    T: AsRef<str>,
{
    clear_options(select)?;
    for (value, text) in pairs {
        create_option(select, text.as_ref(), value.as_ref())?;
    }
    Ok(())
}

/// Selected options, empty if nothing is selected.
///
/// A single-select yields at most one option.
pub fn selected_options<S: SelectControl>(select: &S) -> Vec<S::OptionElement> {
    if let Some(native) = select.native_selected_options() {
        return native;
    }

    let Some(start) = select.selected_index() else {
        return Vec::new();
    };
    let mut options = select.options().into_iter().skip(start);
    let Some(first) = options.next() else {
        return Vec::new();
    };
    if !select.is_multiple() {
        return vec![first];
    }

    // selected_index is the first selected option, so only later ones
    // need checking.
    let mut selected = vec![first];
    selected.extend(options.filter(SelectOption::is_selected));
    selected
}

/// Options carrying the `selected` attribute in markup.
///
/// A single-select yields at most one option.
pub fn preselected_options<S: SelectControl>(select: &S) -> Vec<S::OptionElement> {
    let preselected = select
        .options()
        .into_iter()
        .filter(SelectOption::has_selected_attribute);
    if select.is_multiple() {
        preselected.collect()
    } else {
        preselected.take(1).collect()
    }
}

/// Whether an option with exactly `value` is selected.
pub fn value_selected<S: SelectControl>(select: &S, value: &str) -> bool {
    select
        .options()
        .iter()
        .any(|option| option.is_selected() && option.value() == value)
}

/// Index of the first option with exactly `value`.
pub fn option_index<S: SelectControl>(select: &S, value: &str) -> Option<usize> {
    select
        .options()
        .iter()
        .position(|option| option.value() == value)
}
