//! Selection overlay over the loaded document.
//!
//! `SelectionOverlay` is the explicit state for one loaded document: it owns
//! the page handle, the identifier generator, and whether selection mode is on.

use tracing::{debug, warn};

use crate::dom::{
    ElementRef, SelectionPage, HOVER_CLASS, SELECTED_CLASS, SELECTION_ID_ATTR,
};

const SUMMARY_CHARS: usize = 50;

/// Class on every side-list row.
pub const ROW_CLASS: &str = "selected-item";

/// Monotonic `sel-N` identifiers, skipping any already present on the page.
#[derive(Debug, Default)]
pub struct SelectionIds {
    last: u64,
}

impl SelectionIds {
    pub fn next_id(&mut self, is_taken: impl Fn(&str) -> bool) -> String {
        loop {
            self.last += 1;
            let candidate = format!("sel-{}", self.last);
            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }
}

pub struct SelectionOverlay<P: SelectionPage> {
    page: P,
    ids: SelectionIds,
    enabled: bool,
}

impl<P: SelectionPage> SelectionOverlay<P> {
    pub fn new(page: P) -> Self {
        Self {
            page,
            ids: SelectionIds::default(),
            enabled: false,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        if !self.enabled {
            self.page.attach_listeners();
            self.enabled = true;
        }
        self.page.set_panels_visible(true);
    }

    /// Leaves element classes untouched; only the listeners and side list go.
    pub fn disable(&mut self) {
        if self.enabled {
            self.page.detach_listeners();
            self.enabled = false;
        }
        self.page.set_panels_visible(false);
        self.page.clear_rows();
    }

    pub fn hover_in(&self, element: &P::Element) {
        element.add_class(HOVER_CLASS);
    }

    pub fn hover_out(&self, element: &P::Element) {
        element.remove_class(HOVER_CLASS);
    }

    /// Toggles the exact clicked element. Returns the new id when it became selected.
    pub fn click(&mut self, element: &P::Element) -> Option<String> {
        if !self.enabled {
            return None;
        }

        if element.has_class(SELECTED_CLASS) {
            self.deselect(element);
            None
        } else {
            Some(self.select(element))
        }
    }

    fn select(&mut self, element: &P::Element) -> String {
        let page = &self.page;
        let id = self
            .ids
            .next_id(|candidate| page.find_by_selection_id(candidate).is_some());

        element.add_class(SELECTED_CLASS);
        element.set_attr(SELECTION_ID_ATTR, &id);
        self.page.append_row(&id, &summarize(element));
        debug!("Selected <{}> as {id}", element.tag());
        id
    }

    fn deselect(&mut self, element: &P::Element) {
        element.remove_class(SELECTED_CLASS);
        if let Some(id) = element.attr(SELECTION_ID_ATTR) {
            element.clear_attr(SELECTION_ID_ATTR);
            self.page.remove_row(&id);
            debug!("Deselected {id}");
        }
    }

    /// Side-list remove control: drops the row and unmarks the element.
    pub fn remove(&mut self, id: &str) {
        if !self.page.remove_row(id) {
            warn!("No side-list row found for {id}");
        }

        if let Some(element) = self.page.find_by_selection_id(id) {
            element.remove_class(SELECTED_CLASS);
            element.clear_attr(SELECTION_ID_ATTR);
        }
    }

    pub fn selected_elements(&self) -> Vec<P::Element> {
        self.page.selected_elements()
    }

    /// Unmarks `elements` after their text was personalized, then disables.
    pub fn finish(&mut self, elements: &[P::Element]) {
        for element in elements {
            element.remove_class(SELECTED_CLASS);
            element.remove_class(HOVER_CLASS);
            element.clear_attr(SELECTION_ID_ATTR);
        }
        self.disable();
    }
}

/// Side-list text: `tag: first 50 chars...`.
pub fn summarize<E: ElementRef>(element: &E) -> String {
    let text = element.text();
    let snippet: String = text.trim().chars().take(SUMMARY_CHARS).collect();
    format!("{}: {}...", element.tag(), snippet)
}

/// Direct lookup of the marker inside a side-list row.
pub fn row_marker_selector(id: &str) -> String {
    format!(".{ROW_CLASS} [{SELECTION_ID_ATTR}=\"{id}\"]")
}

/// Structural fallback: the row that contains the marker.
pub fn row_fallback_selector(id: &str) -> String {
    format!(".{ROW_CLASS}:has([{SELECTION_ID_ATTR}=\"{id}\"])")
}

/// Finds the side-list row for `id`: the row enclosing the direct marker first,
/// then the structural query. `row_of` climbs from a marker to its row.
pub fn locate_row<R>(
    id: &str,
    query: impl Fn(&str) -> Option<R>,
    row_of: impl Fn(R) -> Option<R>,
) -> Option<R> {
    query(&row_marker_selector(id))
        .and_then(row_of)
        .or_else(|| query(&row_fallback_selector(id)))
}

/// The selected element inside the display region.
pub fn element_selector(id: &str) -> String {
    format!("[{SELECTION_ID_ATTR}=\"{id}\"]")
}
