//! Cash boxes (`/caixas`).

use loteria_core::types::{CashBox, Page};
use loteria_core::validation::validate_required;

use crate::api::{ApiRequest, PageRequest};
use crate::error::ClientResult;
use crate::session::SessionManager;

pub struct CashBoxService<'a> {
    session: &'a SessionManager,
}

impl<'a> CashBoxService<'a> {
    pub(crate) fn new(session: &'a SessionManager) -> Self {
        CashBoxService { session }
    }

    pub async fn list(&self, page: PageRequest) -> ClientResult<Page<CashBox>> {
        self.session.require_session().await?;
        self.session.fetch(ApiRequest::get("/caixas").paged(page)).await
    }

    /// Boxes the count and sale forms may pick from.
    pub async fn active(&self) -> ClientResult<Vec<CashBox>> {
        self.session.require_session().await?;
        self.session.fetch(ApiRequest::get("/caixas/ativas")).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<CashBox> {
        let id = validate_required("id", id)?;
        self.session.require_session().await?;
        self.session.fetch(ApiRequest::get(format!("/caixas/{}", id))).await
    }
}
