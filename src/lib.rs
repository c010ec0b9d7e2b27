pub mod collect;
pub mod download;
mod error;
pub mod fetch;
pub mod listing;
pub mod locate;
pub mod sanitize;

pub use error::{Result, ScrapeError};
