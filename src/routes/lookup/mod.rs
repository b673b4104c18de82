mod handler;
mod model;

pub use handler::{get_progress, get_user, lookup_batch, run_batch, run_single};
pub use model::{BatchLookupRequest, BatchLookupResponse};
