//! Browser side of the ad composer.
//!
//! The workflow logic (selection overlay, document loading, target picker,
//! personalization trigger) is written against the small DOM traits in
//! [`dom`], so it runs natively under test. The `wasm` module binds those
//! traits to `web-sys` and wires the page up.

pub mod api;
pub mod dom;
pub mod loader;
pub mod personalize;
pub mod picker;
pub mod selection;

#[cfg(test)]
mod fake;

#[cfg(target_arch = "wasm32")]
mod wasm;
