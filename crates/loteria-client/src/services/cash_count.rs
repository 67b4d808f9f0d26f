//! Cash counts (`/contagem-caixa`).

use chrono::NaiveDate;
use loteria_core::cash_count::CashCountRequest;
use loteria_core::types::{CashCount, Page};
use loteria_core::validation::{validate_period, validate_required};
use tracing::info;

use crate::api::{ApiRequest, PageRequest};
use crate::error::ClientResult;
use crate::session::SessionManager;

/// Dates travel as `YYYY-MM-DD`.
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CashCountService<'a> {
    session: &'a SessionManager,
}

impl<'a> CashCountService<'a> {
    pub(crate) fn new(session: &'a SessionManager) -> Self {
        CashCountService { session }
    }

    pub async fn list(&self, page: PageRequest) -> ClientResult<Page<CashCount>> {
        self.session.require_session().await?;
        self.session
            .fetch(ApiRequest::get("/contagem-caixa").paged(page))
            .await
    }

    /// Counts dated between `start` and `end`, inclusive.
    pub async fn by_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        page: PageRequest,
    ) -> ClientResult<Page<CashCount>> {
        validate_period(start, end)?;
        self.session.require_session().await?;

        let request = ApiRequest::get("/contagem-caixa/periodo")
            .query("dataInicio", start.format(DATE_FORMAT))
            .query("dataFim", end.format(DATE_FORMAT))
            .paged(page);
        self.session.fetch(request).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<CashCount> {
        let id = validate_required("id", id)?;
        self.session.require_session().await?;
        self.session
            .fetch(ApiRequest::get(format!("/contagem-caixa/{}", id)))
            .await
    }

    /// Submits a count. The payload is sent exactly as built by the core.
    pub async fn create(&self, request: &CashCountRequest) -> ClientResult<CashCount> {
        let session = self.session.require_session().await?;
        let created: CashCount = self
            .session
            .fetch(ApiRequest::post("/contagem-caixa").json(request)?)
            .await?;

        info!(
            count_id = %created.id,
            box_id = %created.box_id,
            user_id = %session.user.id,
            "Cash count submitted"
        );
        Ok(created)
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let id = validate_required("id", id)?;
        self.session.require_session().await?;
        self.session
            .send(ApiRequest::delete(format!("/contagem-caixa/{}", id)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use loteria_core::cash_count::{DenominationSet, DenominationTable};
    use serde_json::json;

    use crate::api::Method;
    use crate::config::ClientConfig;
    use crate::error::ClientError;
    use crate::storage::MemoryStore;
    use crate::testing::{logged_in, MockApi};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_sends_core_payload_verbatim() {
        let api = Arc::new(MockApi::new());
        api.respond(
            "POST /contagem-caixa",
            Ok(json!({
                "id": "cc1",
                "caixaId": "b1",
                "dataContagem": "2024-05-01",
                "valorInicial": 0.0,
                "valorFinal": 204.05,
                "diferenca": 204.05,
                "responsavelId": "u1"
            })),
        );
        let sessions = logged_in(&api, "VENDEDOR").await;

        let mut set = DenominationSet::new(DenominationTable::brl());
        set.set("200", 1).unwrap();
        set.set("1", 4).unwrap();
        set.set("0.05", 1).unwrap();
        let payload = CashCountRequest::new(&set, "b1", date(2024, 5, 1), date(2024, 5, 1)).unwrap();

        let created = sessions.cash_counts().create(&payload).await.unwrap();
        assert_eq!(created.closing_amount.cents(), 20405);

        let sent = api.requests().await.pop().unwrap();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.body, Some(serde_json::to_value(&payload).unwrap()));
    }

    #[tokio::test]
    async fn test_by_period_query() {
        let api = Arc::new(MockApi::new());
        api.respond(
            "GET /contagem-caixa/periodo",
            Ok(json!({
                "content": [], "totalElements": 0, "totalPages": 0,
                "size": 20, "number": 0, "first": true, "last": true
            })),
        );
        let sessions = logged_in(&api, "ADMIN").await;

        let page = sessions
            .cash_counts()
            .by_period(date(2024, 5, 1), date(2024, 5, 31), PageRequest::default())
            .await
            .unwrap();
        assert!(page.content.is_empty());

        let sent = api.requests().await.pop().unwrap();
        assert_eq!(sent.query[0], ("dataInicio".to_string(), "2024-05-01".to_string()));
        assert_eq!(sent.query[1], ("dataFim".to_string(), "2024-05-31".to_string()));

        assert!(matches!(
            sessions
                .cash_counts()
                .by_period(date(2024, 6, 1), date(2024, 5, 1), PageRequest::default())
                .await,
            Err(ClientError::Core(_))
        ));
    }

    #[tokio::test]
    async fn test_requires_session() {
        let api = Arc::new(MockApi::new());
        let sessions = SessionManager::new(api.clone(), Arc::new(MemoryStore::new()), &ClientConfig::default());

        assert!(matches!(
            sessions.cash_counts().delete("cc1").await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(api.requests().await.is_empty());
    }
}
