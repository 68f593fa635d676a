//! Session persistence: storage seam plus the typed login/logout lifecycle.

pub mod session;
pub mod store;

pub use session::{Session, HOST_KEY, SESSION_NAME_KEY, USER_DATA_KEY};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
