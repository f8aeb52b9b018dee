//! DOM seams used by the composer workflow.

/// Class added while the pointer is over an element.
pub const HOVER_CLASS: &str = "hover-highlight";
/// Class marking an element chosen for personalization.
pub const SELECTED_CLASS: &str = "selected-element";
/// Attribute linking a selected element to its side-list row.
pub const SELECTION_ID_ATTR: &str = "data-selection-id";

/// A handle to one element. Handles are cheap to clone and share the node.
pub trait ElementRef: Clone {
    /// Lower-case tag name.
    fn tag(&self) -> String;
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn attr(&self, name: &str) -> Option<String>;
    fn set_attr(&self, name: &str, value: &str);
    fn clear_attr(&self, name: &str);
}

/// The host page as seen by the selection overlay: the display region with
/// the loaded document, the instruction panel, and the side list.
pub trait SelectionPage {
    type Element: ElementRef;

    /// Hooks hover and click handling onto the display region root.
    fn attach_listeners(&self);
    fn detach_listeners(&self);
    /// Shows or hides the instruction panel and the side list together.
    fn set_panels_visible(&self, visible: bool);
    /// Elements in the display region carrying [`SELECTED_CLASS`], in document order.
    fn selected_elements(&self) -> Vec<Self::Element>;
    fn find_by_selection_id(&self, id: &str) -> Option<Self::Element>;
    fn append_row(&self, id: &str, summary: &str);
    /// Returns false when no row for `id` exists.
    fn remove_row(&self, id: &str) -> bool;
    fn clear_rows(&self);
}

/// A `<select>` whose first option is a placeholder.
pub trait Dropdown {
    fn option_count(&self) -> usize;
    fn remove_option(&self, index: usize);
    fn append_option(&self, value: &str, label: &str);
    /// Value of the chosen option; empty for the placeholder.
    fn value(&self) -> String;
}
