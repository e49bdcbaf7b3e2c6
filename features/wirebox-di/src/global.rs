//! The process wide container
//!
//! Optional - the container itself never reads it. Prefer passing a [Container] around,
//! use this where threading a handle through is impractical.

use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::container::Container;

static INSTANCE: OnceLock<RwLock<Container>> = OnceLock::new();

fn slot() -> &'static RwLock<Container> {
    INSTANCE.get_or_init(|| {
        tracing::debug!("Creating the global container");
        RwLock::new(Container::new())
    })
}

/// Returns a handle to the global container, creating an empty one on first access
pub fn get_instance() -> Container {
    slot().read().clone()
}

/// Replaces the global container
///
/// Handles obtained before keep pointing to the previous container.
pub fn set_instance(container: Container) -> Container {
    *slot().write() = container.clone();
    container
}
