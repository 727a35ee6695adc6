//! In-memory DOM elements
//!
//! Shared-handle mocks for the `bz_core::dom` traits. Cloning an element
//! clones the handle, so a test can keep one and inspect what a helper did.

use bz_core::dom::{
    ClassList, DomError, LayoutNode, Position, SelectControl, SelectOption, StyleTarget,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct ElementData {
    offset_left: Cell<i32>,
    offset_top: Cell<i32>,
    offset_width: Cell<i32>,
    offset_height: Cell<i32>,
    scroll_width: Cell<i32>,
    scroll_height: Cell<i32>,
    position: Cell<Position>,
    legacy_xy: Cell<Option<(i32, i32)>>,
    offset_parent: RefCell<Option<MockElement>>,
    style: RefCell<BTreeMap<String, String>>,
    classes: RefCell<Vec<String>>,
}

/// A laid-out element with inline style and a class list.
#[derive(Debug, Clone, Default)]
pub struct MockElement {
    data: Rc<ElementData>,
}

impl MockElement {
    /// Zero-sized, statically positioned element with no offset parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `offsetLeft` / `offsetTop`.
    pub fn at(self, left: i32, top: i32) -> Self {
        self.data.offset_left.set(left);
        self.data.offset_top.set(top);
        self
    }

    /// Set `offsetWidth` / `offsetHeight`.
    pub fn sized(self, width: i32, height: i32) -> Self {
        self.data.offset_width.set(width);
        self.data.offset_height.set(height);
        self
    }

    /// Set `scrollWidth` / `scrollHeight`.
    pub fn scroll_size(self, width: i32, height: i32) -> Self {
        self.data.scroll_width.set(width);
        self.data.scroll_height.set(height);
        self
    }

    /// Set the computed `position`.
    pub fn positioned(self, position: Position) -> Self {
        self.data.position.set(position);
        self
    }

    /// Set legacy `x` / `y`.
    pub fn legacy_xy(self, x: i32, y: i32) -> Self {
        self.data.legacy_xy.set(Some((x, y)));
        self
    }

    /// Make `parent` the offset parent.
    pub fn inside(self, parent: &MockElement) -> Self {
        *self.data.offset_parent.borrow_mut() = Some(parent.clone());
        self
    }

    /// Add classes.
    pub fn with_classes(self, names: &[&str]) -> Self {
        self.data
            .classes
            .borrow_mut()
            .extend(names.iter().map(|name| name.to_string()));
        self
    }

    /// Inline style property.
    pub fn style(&self, name: &str) -> Option<String> {
        self.data.style.borrow().get(name).cloned()
    }

    /// Current classes in order.
    pub fn classes(&self) -> Vec<String> {
        self.data.classes.borrow().clone()
    }
}

impl LayoutNode for MockElement {
    fn offset_left(&self) -> i32 {
        self.data.offset_left.get()
    }

    fn offset_top(&self) -> i32 {
        self.data.offset_top.get()
    }

    fn offset_width(&self) -> i32 {
        self.data.offset_width.get()
    }

    fn offset_height(&self) -> i32 {
        self.data.offset_height.get()
    }

    fn scroll_width(&self) -> i32 {
        self.data.scroll_width.get()
    }

    fn scroll_height(&self) -> i32 {
        self.data.scroll_height.get()
    }

    fn offset_parent(&self) -> Option<Self> {
        self.data.offset_parent.borrow().clone()
    }

    fn position(&self) -> Position {
        self.data.position.get()
    }

    fn legacy_x(&self) -> Option<i32> {
        self.data.legacy_xy.get().map(|(x, _)| x)
    }

    fn legacy_y(&self) -> Option<i32> {
        self.data.legacy_xy.get().map(|(_, y)| y)
    }
}

impl StyleTarget for MockElement {
    fn set_style_property(&self, name: &str, value: &str) -> Result<(), DomError> {
        self.data
            .style
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

impl ClassList for MockElement {
    fn has_class(&self, name: &str) -> bool {
        self.data.classes.borrow().iter().any(|class| class == name)
    }

    fn add_class(&self, name: &str) -> Result<(), DomError> {
        if !self.has_class(name) {
            self.data.classes.borrow_mut().push(name.to_string());
        }
        Ok(())
    }

    fn remove_class(&self, name: &str) -> Result<(), DomError> {
        self.data.classes.borrow_mut().retain(|class| class != name);
        Ok(())
    }
}

#[derive(Debug)]
struct OptionData {
    value: String,
    text: String,
    selected: Cell<bool>,
    selected_attribute: Cell<bool>,
}

/// An `<option>`.
#[derive(Debug, Clone)]
pub struct MockOption {
    data: Rc<OptionData>,
}

impl MockOption {
    /// Unselected option.
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            data: Rc::new(OptionData {
                value: value.into(),
                text: text.into(),
                selected: Cell::new(false),
                selected_attribute: Cell::new(false),
            }),
        }
    }

    /// Currently selected, without a `selected` attribute.
    pub fn selected(self) -> Self {
        self.data.selected.set(true);
        self
    }

    /// Carries the `selected` attribute, and is therefore selected.
    pub fn preselected(self) -> Self {
        self.data.selected_attribute.set(true);
        self.data.selected.set(true);
        self
    }

    /// Change selectedness, leaving the attribute alone.
    pub fn set_selected(&self, selected: bool) {
        self.data.selected.set(selected);
    }
}

impl SelectOption for MockOption {
    fn value(&self) -> String {
        self.data.value.clone()
    }

    fn text(&self) -> String {
        self.data.text.clone()
    }

    fn is_selected(&self) -> bool {
        self.data.selected.get()
    }

    fn has_selected_attribute(&self) -> bool {
        self.data.selected_attribute.get()
    }
}

#[derive(Debug, Default)]
struct SelectData {
    options: RefCell<Vec<MockOption>>,
    multiple: bool,
    native_selected_options: bool,
}

/// A `<select>`.
#[derive(Debug, Clone, Default)]
pub struct MockSelect {
    data: Rc<SelectData>,
}

impl MockSelect {
    /// Single-select with `options`.
    pub fn single(options: Vec<MockOption>) -> Self {
        Self::build(options, false, false)
    }

    /// Multi-select with `options`.
    pub fn multiple(options: Vec<MockOption>) -> Self {
        Self::build(options, true, false)
    }

    /// Same options, but the host provides `selectedOptions`.
    pub fn with_native_selected_options(self) -> Self {
        Self::build(self.options(), self.data.multiple, true)
    }

    fn build(options: Vec<MockOption>, multiple: bool, native_selected_options: bool) -> Self {
        Self {
            data: Rc::new(SelectData {
                options: RefCell::new(options),
                multiple,
                native_selected_options,
            }),
        }
    }

    /// Values in order.
    pub fn values(&self) -> Vec<String> {
        self.data.options.borrow().iter().map(SelectOption::value).collect()
    }

    /// Labels in order.
    pub fn texts(&self) -> Vec<String> {
        self.data.options.borrow().iter().map(SelectOption::text).collect()
    }
}

impl SelectControl for MockSelect {
    type OptionElement = MockOption;

    fn options(&self) -> Vec<MockOption> {
        self.data.options.borrow().clone()
    }

    fn selected_index(&self) -> Option<usize> {
        self.data
            .options
            .borrow()
            .iter()
            .position(SelectOption::is_selected)
    }

    fn is_multiple(&self) -> bool {
        self.data.multiple
    }

    fn native_selected_options(&self) -> Option<Vec<MockOption>> {
        self.data.native_selected_options.then(|| {
            self.data
                .options
                .borrow()
                .iter()
                .filter(|option| option.is_selected())
                .cloned()
                .collect()
        })
    }

    fn new_option(&self, text: &str, value: &str) -> Result<MockOption, DomError> {
        Ok(MockOption::new(value, text))
    }

    fn append_option(&self, option: &MockOption) -> Result<(), DomError> {
        self.data.options.borrow_mut().push(option.clone());
        Ok(())
    }

    fn remove_option(&self, index: usize) -> Result<(), DomError> {
        let mut options = self.data.options.borrow_mut();
        if index >= options.len() {
            return Err(DomError::OutOfRange {
                index,
                len: options.len(),
            });
        }
        options.remove(index);
        Ok(())
    }
}
