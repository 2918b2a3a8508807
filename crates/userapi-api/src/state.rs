use std::sync::Arc;
use userapi_db::Gateway;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ApiContext {
    pub gateway: Arc<dyn Gateway>,
}

impl ApiContext {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}
