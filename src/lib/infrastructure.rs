//! Infrastructure layer: adapters for the database, SMTP, filesystem and HTTP

pub mod db;
pub mod email;
pub mod http;
pub mod templates;
