//! `web-sys` bindings for the DOM traits.

use std::cell::RefCell;
use std::rc::Weak;

use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlOptionElement, HtmlSelectElement};

use super::Composer;
use crate::dom::{Dropdown, ElementRef, SelectionPage, SELECTED_CLASS, SELECTION_ID_ATTR};
use crate::selection::{element_selector, locate_row, ROW_CLASS};

const INSTRUCTION_ID: &str = "selectionInstruction";
const SELECTED_PANEL_ID: &str = "selectedElements";
const LIST_ID: &str = "elementsList";
const REMOVE_CLASS: &str = "remove-item";

type Listener = Closure<dyn FnMut(Event)>;

struct RegionListeners {
    over: Listener,
    out: Listener,
    click: Listener,
    /// Delegated handler for every remove control in the side list.
    remove: Listener,
    list: Option<Element>,
}

impl RegionListeners {
    fn each(&self) -> [(&'static str, &Listener); 3] {
        [
            ("mouseover", &self.over),
            ("mouseout", &self.out),
            ("click", &self.click),
        ]
    }
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn log_js_error(action: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        warn!("{action} failed: {e:?}");
    }
}

impl ElementRef for Element {
    fn tag(&self) -> String {
        self.tag_name().to_lowercase()
    }

    fn text(&self) -> String {
        self.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        log_js_error("add class", self.class_list().add_1(class));
    }

    fn remove_class(&self, class: &str) {
        log_js_error("remove class", self.class_list().remove_1(class));
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attr(&self, name: &str, value: &str) {
        log_js_error("set attribute", self.set_attribute(name, value));
    }

    fn clear_attr(&self, name: &str) {
        log_js_error("remove attribute", self.remove_attribute(name));
    }
}

impl Dropdown for HtmlSelectElement {
    fn option_count(&self) -> usize {
        self.length() as usize
    }

    fn remove_option(&self, index: usize) {
        self.remove_with_index(index as i32);
    }

    fn append_option(&self, value: &str, label: &str) {
        match HtmlOptionElement::new_with_text_and_value(label, value) {
            Ok(option) => log_js_error("add option", self.add_with_html_option_element(&option)),
            Err(e) => warn!("Creating option {value} failed: {e:?}"),
        }
    }

    fn value(&self) -> String {
        HtmlSelectElement::value(self)
    }
}

/// The display region plus the side panels of the host page.
pub(crate) struct WebPage {
    document: Document,
    region: Element,
    composer: Weak<Composer>,
    listeners: RefCell<Option<RegionListeners>>,
}

impl WebPage {
    pub(crate) fn new(document: Document, region: Element, composer: Weak<Composer>) -> Self {
        Self {
            document,
            region,
            composer,
            listeners: RefCell::new(None),
        }
    }

    fn panel(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn listener(&self, handle: impl Fn(&Composer, &Element, &Event) + 'static) -> Listener {
        let composer = self.composer.clone();
        Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
            let Some(composer) = composer.upgrade() else {
                return;
            };
            if let Some(element) = event_element(&event) {
                handle(&composer, &element, &event);
            }
        }))
    }

    fn remove_control(&self, id: &str) -> Result<Element, JsValue> {
        let button = self.document.create_element("button")?;
        button.set_class_name(REMOVE_CLASS);
        button.set_attribute(SELECTION_ID_ATTR, id)?;
        button.set_text_content(Some("\u{2715}"));
        Ok(button)
    }

    fn build_row(&self, id: &str, summary: &str) -> Result<Element, JsValue> {
        let row = self.document.create_element("div")?;
        row.set_class_name(ROW_CLASS);

        let label = self.document.create_element("span")?;
        label.set_text_content(Some(summary));
        row.append_child(&label)?;
        row.append_child(&self.remove_control(id)?)?;
        Ok(row)
    }
}

impl SelectionPage for WebPage {
    type Element = Element;

    fn attach_listeners(&self) {
        let listeners = RegionListeners {
            over: self.listener(|composer, element, event| {
                event.stop_propagation();
                composer.hover(element, true);
            }),
            out: self.listener(|composer, element, event| {
                event.stop_propagation();
                composer.hover(element, false);
            }),
            click: self.listener(|composer, element, event| {
                event.prevent_default();
                event.stop_propagation();
                composer.toggle(element);
            }),
            remove: self.listener(|composer, element, event| {
                let control = element.closest(&format!(".{REMOVE_CLASS}")).ok().flatten();
                if let Some(id) = control.and_then(|c| c.get_attribute(SELECTION_ID_ATTR)) {
                    event.prevent_default();
                    composer.remove_selection(&id);
                }
            }),
            list: self.document.get_element_by_id(LIST_ID),
        };

        for (kind, listener) in listeners.each() {
            log_js_error(
                kind,
                self.region
                    .add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref()),
            );
        }
        match &listeners.list {
            Some(list) => log_js_error(
                "remove control",
                list.add_event_listener_with_callback(
                    "click",
                    listeners.remove.as_ref().unchecked_ref(),
                ),
            ),
            None => warn!("#{LIST_ID} is missing"),
        }
        *self.listeners.borrow_mut() = Some(listeners);
    }

    fn detach_listeners(&self) {
        let Some(listeners) = self.listeners.borrow_mut().take() else {
            return;
        };
        for (kind, listener) in listeners.each() {
            log_js_error(
                kind,
                self.region
                    .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref()),
            );
        }
        if let Some(list) = &listeners.list {
            log_js_error(
                "remove control",
                list.remove_event_listener_with_callback(
                    "click",
                    listeners.remove.as_ref().unchecked_ref(),
                ),
            );
        }
    }

    fn set_panels_visible(&self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        for id in [INSTRUCTION_ID, SELECTED_PANEL_ID] {
            match self.panel(id) {
                Some(panel) => log_js_error(id, panel.style().set_property("display", display)),
                None => warn!("#{id} is missing"),
            }
        }
    }

    fn selected_elements(&self) -> Vec<Element> {
        let Ok(nodes) = self.region.query_selector_all(&format!(".{SELECTED_CLASS}")) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn find_by_selection_id(&self, id: &str) -> Option<Element> {
        self.region.query_selector(&element_selector(id)).ok().flatten()
    }

    fn append_row(&self, id: &str, summary: &str) {
        let Some(list) = self.document.get_element_by_id(LIST_ID) else {
            warn!("#{LIST_ID} is missing");
            return;
        };
        let appended = self
            .build_row(id, summary)
            .and_then(|row| list.append_child(&row).map(|_| ()));
        log_js_error("append row", appended);
    }

    fn remove_row(&self, id: &str) -> bool {
        let row = locate_row(
            id,
            |selector| self.document.query_selector(selector).ok().flatten(),
            |marker| marker.closest(&format!(".{ROW_CLASS}")).ok().flatten(),
        );

        match row {
            Some(row) => {
                row.remove();
                true
            }
            None => false,
        }
    }

    fn clear_rows(&self) {
        if let Some(list) = self.document.get_element_by_id(LIST_ID) {
            list.set_inner_html("");
        }
    }
}
