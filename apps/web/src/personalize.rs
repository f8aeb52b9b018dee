//! Personalization trigger: checks preconditions, builds the request from the
//! current selection, and writes rewritten texts back into the page.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{PersonalizeRequest, PersonalizeResponse};
use crate::dom::{ElementRef, SelectionPage};
use crate::selection::SelectionOverlay;

/// Failures the user sees as a blocking alert. `Display` is the alert text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("Please select a target first")]
    NoTarget,

    #[error("Please select elements to personalize")]
    NothingSelected,

    #[error("Failed to load URL: {0}")]
    LoadFailed(String),

    #[error("Failed to personalize content")]
    PersonalizeFailed(String),
}

pub const SUCCESS_MESSAGE: &str =
    "Content personalized successfully! Selection mode is now disabled.";

/// The selected elements, in document order, and the request built from them.
#[derive(Debug)]
pub struct Prepared<E> {
    pub elements: Vec<E>,
    pub request: PersonalizeRequest,
}

/// Checks the target and selection before anything is sent.
pub fn prepare<E: ElementRef>(target: &str, elements: Vec<E>) -> Result<Prepared<E>, WorkflowError> {
    if target.is_empty() {
        return Err(WorkflowError::NoTarget);
    }
    if elements.is_empty() {
        return Err(WorkflowError::NothingSelected);
    }

    let texts = elements.iter().map(|e| e.text().trim().to_string()).collect();

    Ok(Prepared {
        elements,
        request: PersonalizeRequest {
            client: target.to_string(),
            texts,
        },
    })
}

/// Overwrites each element with the rewritten text at the same index.
/// Missing or empty entries leave the element as it was. Returns the count written.
pub fn apply_personalized<E: ElementRef>(elements: &[E], response: &PersonalizeResponse) -> usize {
    let mut written = 0;
    for (index, element) in elements.iter().enumerate() {
        match response.personalized_content.get(index) {
            Some(text) if !text.is_empty() => {
                element.set_text(text);
                written += 1;
            }
            _ => warn!("No personalized text for element {index}; keeping original"),
        }
    }
    written
}

/// Applies a successful response and ends selection mode.
pub fn complete<P: SelectionPage>(
    overlay: &mut SelectionOverlay<P>,
    prepared: &Prepared<P::Element>,
    response: &PersonalizeResponse,
) -> usize {
    let written = apply_personalized(&prepared.elements, response);
    info!(
        "Personalized {written} of {} elements for {}",
        prepared.elements.len(),
        prepared.request.client
    );
    overlay.finish(&prepared.elements);
    written
}
