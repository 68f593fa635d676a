//! vtiger REST bridge client: endpoint plumbing, wire models, and the
//! [`RecordService`] contract the rest of the crate consumes.

pub mod client;
pub mod constants;
pub mod models;
pub mod service;

pub use client::VtigerClient;
pub use models::{LoginSession, ModuleDescriptor, RecordDetail, UserProfile};
pub use service::RecordService;
