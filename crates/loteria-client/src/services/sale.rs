//! Sales (`/vendas-caixa`).

use loteria_core::access::{Action, Resource};
use loteria_core::sale::SaleRequest;
use loteria_core::types::{Page, Sale};
use loteria_core::validation::validate_required;
use tracing::info;

use crate::api::{ApiRequest, PageRequest};
use crate::error::ClientResult;
use crate::session::SessionManager;

pub struct SaleService<'a> {
    session: &'a SessionManager,
}

impl<'a> SaleService<'a> {
    pub(crate) fn new(session: &'a SessionManager) -> Self {
        SaleService { session }
    }

    pub async fn list(&self, page: PageRequest) -> ClientResult<Page<Sale>> {
        self.session.authorize(Resource::Sales, Action::Read).await?;
        self.session
            .fetch(ApiRequest::get("/vendas-caixa").paged(page))
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Sale> {
        let id = validate_required("id", id)?;
        self.session.authorize(Resource::Sales, Action::Read).await?;
        self.session
            .fetch(ApiRequest::get(format!("/vendas-caixa/{}", id)))
            .await
    }

    /// Records a sale built by [`SaleDraft::validate`](loteria_core::sale::SaleDraft::validate).
    pub async fn create(&self, request: &SaleRequest) -> ClientResult<Sale> {
        self.session.authorize(Resource::Sales, Action::Create).await?;
        let sale: Sale = self
            .session
            .fetch(ApiRequest::post("/vendas-caixa").json(request)?)
            .await?;

        info!(sale_id = %sale.id, total = %sale.total_price, "Sale recorded");
        Ok(sale)
    }

    pub async fn update(&self, id: &str, request: &SaleRequest) -> ClientResult<Sale> {
        let id = validate_required("id", id)?;
        self.session.authorize(Resource::Sales, Action::Update).await?;
        self.session
            .fetch(ApiRequest::put(format!("/vendas-caixa/{}", id)).json(request)?)
            .await
    }
}
