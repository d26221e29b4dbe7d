use crate::infrastructure::database::SharedStore;

/// Shared handler state. Cloned per request, so it only holds handles.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}
