mod export;
mod page;

pub use export::{CSV_HEADER, ExportStore, export_file_name, to_csv};
pub use page::{Notice, PageView, render};
