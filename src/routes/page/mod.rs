mod handler;
mod model;

pub use handler::{download_export, index, submit_batch, submit_search};
pub use model::{BatchForm, SearchForm};
