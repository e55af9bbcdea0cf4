//! Plain data shared by the core and the presentation layer.

pub mod errors;
pub mod model;
