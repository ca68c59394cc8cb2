pub mod auth;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod protocol;
pub mod scoring;
pub mod store;

pub use catalog::SectionKey;
pub use config::AppConfig;
pub use dashboard::Dashboard;
pub use error::{AppraisalError, Result};
pub use form::{Notice, SectionController};
pub use store::SectionStore;
