//! Stored email templates: management, lookup and rendering.

mod renderer;
mod repository;
mod service;
mod source;
mod template;

pub mod errors;

pub use renderer::render;
pub use repository::TemplateRepository;
pub use service::{TemplateService, TemplateServiceImpl};
pub use source::{StoreTemplateSource, TemplateSource};
pub use template::{NewTemplate, Template};

/// Key/value data a template is rendered against
pub type TemplateData = serde_json::Map<String, serde_json::Value>;
