//! In-memory DOM used by the workflow tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{Dropdown, ElementRef, SelectionPage, SELECTED_CLASS, SELECTION_ID_ATTR};
use crate::selection::{locate_row, row_fallback_selector, row_marker_selector};

#[derive(Debug, Default)]
struct Node {
    tag: String,
    text: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct FakeElement(Rc<RefCell<Node>>);

impl FakeElement {
    pub fn new(tag: &str, text: &str) -> Self {
        Self(Rc::new(RefCell::new(Node {
            tag: tag.to_string(),
            text: text.to_string(),
            ..Node::default()
        })))
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }
}

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl ElementRef for FakeElement {
    fn tag(&self) -> String {
        self.0.borrow().tag.to_lowercase()
    }

    fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.borrow().attrs.get(name).cloned()
    }

    fn set_attr(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn clear_attr(&self, name: &str) {
        self.0.borrow_mut().attrs.remove(name);
    }
}

/// A display region holding `elements` in document order, plus the side panels.
#[derive(Debug, Default)]
pub struct FakePage {
    pub elements: Vec<FakeElement>,
    rows: RefCell<Vec<(String, String)>>,
    panels_visible: Cell<bool>,
    listening: Cell<bool>,
    markerless_rows: Cell<bool>,
}

impl FakePage {
    pub fn with_elements(elements: Vec<FakeElement>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    /// Rows answer only the structural lookup, not the direct marker query.
    pub fn without_row_markers(self) -> Self {
        self.markerless_rows.set(true);
        self
    }

    /// Position of the first row matched by `selector`.
    fn query_rows(&self, selector: &str) -> Option<usize> {
        self.rows.borrow().iter().position(|(row_id, _)| {
            (!self.markerless_rows.get() && selector == row_marker_selector(row_id))
                || selector == row_fallback_selector(row_id)
        })
    }

    pub fn rows(&self) -> Vec<(String, String)> {
        self.rows.borrow().clone()
    }

    pub fn panels_visible(&self) -> bool {
        self.panels_visible.get()
    }

    pub fn listening(&self) -> bool {
        self.listening.get()
    }
}

impl SelectionPage for FakePage {
    type Element = FakeElement;

    fn attach_listeners(&self) {
        self.listening.set(true);
    }

    fn detach_listeners(&self) {
        self.listening.set(false);
    }

    fn set_panels_visible(&self, visible: bool) {
        self.panels_visible.set(visible);
    }

    fn selected_elements(&self) -> Vec<FakeElement> {
        self.elements
            .iter()
            .filter(|e| e.has_class(SELECTED_CLASS))
            .cloned()
            .collect()
    }

    fn find_by_selection_id(&self, id: &str) -> Option<FakeElement> {
        self.elements
            .iter()
            .find(|e| e.attr(SELECTION_ID_ATTR).as_deref() == Some(id))
            .cloned()
    }

    fn append_row(&self, id: &str, summary: &str) {
        self.rows
            .borrow_mut()
            .push((id.to_string(), summary.to_string()));
    }

    fn remove_row(&self, id: &str) -> bool {
        match locate_row(id, |selector| self.query_rows(selector), Some) {
            Some(position) => {
                self.rows.borrow_mut().remove(position);
                true
            }
            None => false,
        }
    }

    fn clear_rows(&self) {
        self.rows.borrow_mut().clear();
    }
}

/// A `<select>` as a list of `(value, label)` pairs; index 0 is the placeholder.
#[derive(Debug)]
pub struct FakeDropdown {
    options: RefCell<Vec<(String, String)>>,
    chosen: RefCell<String>,
}

impl FakeDropdown {
    pub fn with_placeholder(label: &str) -> Self {
        Self {
            options: RefCell::new(vec![(String::new(), label.to_string())]),
            chosen: RefCell::new(String::new()),
        }
    }

    pub fn values(&self) -> Vec<String> {
        self.options.borrow().iter().map(|(v, _)| v.clone()).collect()
    }

    pub fn choose(&self, value: &str) {
        *self.chosen.borrow_mut() = value.to_string();
    }
}

impl Dropdown for FakeDropdown {
    fn option_count(&self) -> usize {
        self.options.borrow().len()
    }

    fn remove_option(&self, index: usize) {
        let mut options = self.options.borrow_mut();
        if index < options.len() {
            options.remove(index);
        }
    }

    fn append_option(&self, value: &str, label: &str) {
        self.options
            .borrow_mut()
            .push((value.to_string(), label.to_string()));
    }

    fn value(&self) -> String {
        self.chosen.borrow().clone()
    }
}
