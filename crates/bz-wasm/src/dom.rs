//! DOM helper traits over `web_sys` elements
//!
//! The helper traits live in `bz-core` and the element types in `web-sys`,
//! so the impls go on thin wrappers.

use crate::error::{describe, dom_error};
use bz_core::dom::{
    ClassList, DomError, LayoutNode, Position, SelectControl, SelectOption, StyleTarget,
};
use wasm_bindgen::JsCast;
use web_sys::{Event, EventInit, EventTarget, HtmlElement, HtmlOptionElement, HtmlSelectElement};

/// A rendered page element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement(pub HtmlElement);

impl From<HtmlElement> for PageElement {
    fn from(element: HtmlElement) -> Self {
        Self(element)
    }
}

impl PageElement {
    /// Element with `id` in the current document.
    pub fn by_id(id: &str) -> Result<Option<Self>, DomError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(DomError::NoDocument)?;
        Ok(document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .map(Self))
    }

    /// The wrapped element.
    pub fn inner(&self) -> &HtmlElement {
        &self.0
    }
}

impl LayoutNode for PageElement {
    fn offset_left(&self) -> i32 {
        self.0.offset_left()
    }

    fn offset_top(&self) -> i32 {
        self.0.offset_top()
    }

    fn offset_width(&self) -> i32 {
        self.0.offset_width()
    }

    fn offset_height(&self) -> i32 {
        self.0.offset_height()
    }

    fn scroll_width(&self) -> i32 {
        self.0.scroll_width()
    }

    fn scroll_height(&self) -> i32 {
        self.0.scroll_height()
    }

    fn offset_parent(&self) -> Option<Self> {
        self.0
            .offset_parent()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
            .map(Self)
    }

    fn position(&self) -> Position {
        let computed = web_sys::window()
            .and_then(|window| window.get_computed_style(&self.0).ok().flatten())
            .and_then(|style| style.get_property_value("position").ok());
        computed.map_or(Position::Static, |value| Position::from_css(&value))
    }
}

impl StyleTarget for PageElement {
    fn set_style_property(&self, name: &str, value: &str) -> Result<(), DomError> {
        self.0
            .style()
            .set_property(name, value)
            .map_err(dom_error("style.setProperty"))
    }
}

impl ClassList for PageElement {
    fn has_class(&self, name: &str) -> bool {
        self.0.class_list().contains(name)
    }

    fn add_class(&self, name: &str) -> Result<(), DomError> {
        self.0.class_list().add_1(name).map_err(dom_error("classList.add"))
    }

    fn remove_class(&self, name: &str) -> Result<(), DomError> {
        self.0
            .class_list()
            .remove_1(name)
            .map_err(dom_error("classList.remove"))
    }
}

/// An `<option>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOption(pub HtmlOptionElement);

impl SelectOption for PageOption {
    fn value(&self) -> String {
        self.0.value()
    }

    fn text(&self) -> String {
        self.0.text()
    }

    fn is_selected(&self) -> bool {
        self.0.selected()
    }

    fn has_selected_attribute(&self) -> bool {
        self.0.has_attribute("selected")
    }
}

/// A `<select>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelect(pub HtmlSelectElement);

impl From<HtmlSelectElement> for PageSelect {
    fn from(select: HtmlSelectElement) -> Self {
        Self(select)
    }
}

fn collect_options(collection: &web_sys::HtmlCollection) -> Vec<PageOption> {
    (0..collection.length())
        .filter_map(|index| collection.item(index))
        .filter_map(|element| element.dyn_into::<HtmlOptionElement>().ok())
        .map(PageOption)
        .collect()
}

impl SelectControl for PageSelect {
    type OptionElement = PageOption;

    fn options(&self) -> Vec<PageOption> {
        collect_options(&self.0.options())
    }

    fn selected_index(&self) -> Option<usize> {
        usize::try_from(self.0.selected_index()).ok()
    }

    fn is_multiple(&self) -> bool {
        self.0.multiple()
    }

    fn native_selected_options(&self) -> Option<Vec<PageOption>> {
        Some(collect_options(&self.0.selected_options()))
    }

    fn new_option(&self, text: &str, value: &str) -> Result<PageOption, DomError> {
        HtmlOptionElement::new_with_text_and_value(text, value)
            .map(PageOption)
            .map_err(dom_error("new Option"))
    }

    fn append_option(&self, option: &PageOption) -> Result<(), DomError> {
        self.0
            .add_with_html_option_element(&option.0)
            .map_err(dom_error("select.add"))
    }

    fn remove_option(&self, index: usize) -> Result<(), DomError> {
        let len = self.0.length() as usize;
        if index >= len {
            return Err(DomError::OutOfRange { index, len });
        }
        let index = i32::try_from(index).map_err(|_| DomError::OutOfRange { index, len })?;
        self.0.remove_with_index(index);
        Ok(())
    }

    fn option_count(&self) -> usize {
        self.0.length() as usize
    }
}

/// Dispatch a bubbling, cancelable event named `name` at `target`.
///
/// Returns `true` when a listener called `preventDefault()`.
pub fn fire_event(target: &EventTarget, name: &str) -> Result<bool, DomError> {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = Event::new_with_event_init_dict(name, &init)
        .map_err(|err| DomError::operation("new Event", describe(&err)))?;
    let not_cancelled = target
        .dispatch_event(&event)
        .map_err(dom_error("dispatchEvent"))?;
    tracing::trace!(name, cancelled = !not_cancelled, "dispatched event");
    Ok(!not_cancelled)
}
