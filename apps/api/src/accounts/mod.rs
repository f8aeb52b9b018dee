// Target account listing.
// Account names are the top-level keys of each `target_accounts.data` record.

pub mod directory;
pub mod handlers;
