pub mod health;
pub mod page;

pub use page::{page_handler, render_route, PageResponse, PageRoute};
