//! Redis-backed state the UI used to keep in the browser: who is logged in,
//! unfinished wizard drafts and the last known subscription per tenant.

pub mod billing_cache;
pub mod session;
pub mod utils;
pub mod wizard;
