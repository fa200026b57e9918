pub mod identity;
pub mod logging;
pub mod params;

pub use identity::{Caller, MaybeCaller};
pub use params::QueryParams;
