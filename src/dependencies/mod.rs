//! This module defines traits for external collaborators (the Compute API, resource name
//! resolution, the file system) to make them easier to mock and substitute in tests.
//! Commands receive these as boxed trait objects instead of constructing clients themselves.
pub mod compute;
pub mod fs;
pub mod resources;

pub use compute::*;
pub use fs::*;
pub use resources::*;
