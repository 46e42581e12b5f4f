//! Client-side building blocks for the face recognition dashboard: typed
//! backend access, capture sources, the live detection loop, overlay
//! geometry, and the registration wizard's state. Everything here is
//! GUI-free and unit-testable.

pub mod api;
pub mod capture;
pub mod detection;
pub mod overlay;
pub mod registration;
pub mod shared;
