//! Domain layer

pub mod emails;
pub mod history;
pub mod templates;
