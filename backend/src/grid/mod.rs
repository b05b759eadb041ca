//! In-memory data shaping for the user table: exact-match filtering,
//! pagination, the pagination display window, and CSV export.

pub mod csv;
pub mod filter;
pub mod paginate;

pub use filter::UserFilter;
pub use paginate::{page_window, paginate, total_pages, PageItem};
