//! Pools (`/boloes`).

use loteria_core::access::{Action, Resource};
use loteria_core::types::{Page, Pool};
use loteria_core::validation::validate_required;

use crate::api::{ApiRequest, PageRequest};
use crate::error::ClientResult;
use crate::session::SessionManager;

pub struct PoolService<'a> {
    session: &'a SessionManager,
}

impl<'a> PoolService<'a> {
    pub(crate) fn new(session: &'a SessionManager) -> Self {
        PoolService { session }
    }

    pub async fn list(&self, page: PageRequest) -> ClientResult<Page<Pool>> {
        self.session.authorize(Resource::Pools, Action::Read).await?;
        self.session.fetch(ApiRequest::get("/boloes").paged(page)).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Pool> {
        let id = validate_required("id", id)?;
        self.session.authorize(Resource::Pools, Action::Read).await?;
        self.session.fetch(ApiRequest::get(format!("/boloes/{}", id))).await
    }
}
