//! Record endpoint logic, one module per resource.
//!
//! Every read follows the same path: open an Airtable client from config
//! (configuration error if credentials are missing), run the operation's
//! select query, map each record, return the typed result. Failures are
//! converted to [`crate::error::ApiError`] here, at the endpoint boundary.

pub mod leads;
pub mod messages;
pub mod outreach;
pub mod posts;
