pub mod api;
pub mod auth;
pub mod cli;
pub mod draft;
pub mod fields;
pub mod projection;
pub mod related;
pub mod timeutil;
