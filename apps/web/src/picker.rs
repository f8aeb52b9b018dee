//! Target picker: fills the account dropdown.

use tracing::info;

use crate::dom::Dropdown;

/// Replaces every option after the placeholder with `names`.
pub fn populate<D: Dropdown>(dropdown: &D, names: &[String]) {
    while dropdown.option_count() > 1 {
        dropdown.remove_option(1);
    }
    for name in names {
        dropdown.append_option(name, name);
    }
    info!("Loaded {} targets", names.len());
}
