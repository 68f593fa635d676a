//! Field normalization: the typed model for the backend's flat field arrays,
//! plus display formatting, candidate validation, and submit conversion.

pub mod display;
pub mod model;
pub mod submit;
pub mod validate;

pub use display::{display_value, display_value_in, icon_for, EMPTY_PLACEHOLDER};
pub use model::{is_read_only, Field, FieldType, Record, READ_ONLY_FIELDS};
pub use submit::{parse_for_submit, parse_for_submit_in};
pub use validate::validate;
