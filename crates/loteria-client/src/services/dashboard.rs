//! Dashboard metrics (`/dashboard/metrics`).

use loteria_core::access::{Action, Resource};
use loteria_core::types::DashboardMetrics;

use crate::api::ApiRequest;
use crate::error::ClientResult;
use crate::session::SessionManager;

pub struct DashboardService<'a> {
    session: &'a SessionManager,
}

impl<'a> DashboardService<'a> {
    pub(crate) fn new(session: &'a SessionManager) -> Self {
        DashboardService { session }
    }

    pub async fn metrics(&self) -> ClientResult<DashboardMetrics> {
        self.session.authorize(Resource::Dashboard, Action::Read).await?;
        self.session.fetch(ApiRequest::get("/dashboard/metrics")).await
    }
}
