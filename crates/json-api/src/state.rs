//! Handler state

use std::sync::Arc;

use tiffin_app::context::AppContext;

/// Services shared by every handler, injected into the depot once at startup.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    pub(crate) fn shared(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }
}
