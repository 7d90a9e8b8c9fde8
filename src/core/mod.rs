// Core pipeline stages (envelope, sanitize, decode, project) and shared types.
pub mod config;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod fields;
pub mod project;
pub mod raw;
pub mod sanitize;
