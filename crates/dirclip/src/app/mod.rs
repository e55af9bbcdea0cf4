//! Application layer: navigation, selection, and payload aggregation.

pub mod aggregate;
pub mod navigator;
pub mod preview;
pub mod selection;
pub mod view;
