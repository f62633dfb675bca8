//! Liveness
//!
//! Lets long-running work find out whether the view that started it still
//! exists before applying its result.

use std::sync::{Arc, Weak};

/// Held by a view for as long as it is on screen.
#[derive(Debug, Default)]
pub struct ViewScope(Arc<()>);

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that reports whether this scope is still alive.
    #[must_use]
    pub fn liveness(&self) -> Liveness {
        Liveness(Arc::downgrade(&self.0))
    }
}

/// Observer of a [`ViewScope`]. Does not keep the view alive.
#[derive(Debug, Clone)]
pub struct Liveness(Weak<()>);

impl Liveness {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// `value` if the view is still alive, otherwise `None`.
    pub fn retain<T>(&self, value: T) -> Option<T> {
        self.is_alive().then_some(value)
    }
}
