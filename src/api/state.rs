use std::sync::Arc;

use crate::auth::AuthService;
use crate::report::ReportSynthesizer;
use crate::store::ReportStore;

/// Shared by every handler.
pub struct AppState {
    pub store: Arc<dyn ReportStore>,
    pub synthesizer: ReportSynthesizer,
    pub auth: Arc<AuthService>,
    pub crm_sync_token: Option<String>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ReportStore>,
        synthesizer: ReportSynthesizer,
        auth: AuthService,
        crm_sync_token: Option<String>,
    ) -> Self {
        Self {
            store,
            synthesizer,
            auth: Arc::new(auth),
            crm_sync_token,
        }
    }
}
