// Same-origin page proxy used by the composer's document loader.

pub mod fetcher;
pub mod handlers;
