//! Small helpers shared by the calculation and validation layers.

pub mod json;
