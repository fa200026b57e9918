pub mod category;
pub mod source;
pub mod text;

pub use category::{Category, UnknownCategory};
pub use source::Source;
pub use text::{truncate_with_marker, TRUNCATION_MARKER};
