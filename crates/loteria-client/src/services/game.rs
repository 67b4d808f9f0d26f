//! Lottery games (`/jogos`).

use loteria_core::access::{Action, Resource};
use loteria_core::types::{Game, GameRequest, Page};
use loteria_core::validation::validate_required;
use tracing::info;

use crate::api::{ApiRequest, PageRequest};
use crate::error::ClientResult;
use crate::session::SessionManager;

pub struct GameService<'a> {
    session: &'a SessionManager,
}

impl<'a> GameService<'a> {
    pub(crate) fn new(session: &'a SessionManager) -> Self {
        GameService { session }
    }

    pub async fn list(&self, page: PageRequest) -> ClientResult<Page<Game>> {
        self.session.authorize(Resource::Games, Action::Read).await?;
        self.session.fetch(ApiRequest::get("/jogos").paged(page)).await
    }

    /// Games currently on sale.
    pub async fn active(&self) -> ClientResult<Vec<Game>> {
        self.session.authorize(Resource::Games, Action::Read).await?;
        self.session.fetch(ApiRequest::get("/jogos/ativos")).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Game> {
        let id = validate_required("id", id)?;
        self.session.authorize(Resource::Games, Action::Read).await?;
        self.session.fetch(ApiRequest::get(format!("/jogos/{}", id))).await
    }

    pub async fn create(&self, request: &GameRequest) -> ClientResult<Game> {
        validate_required("nome", &request.name)?;
        self.session.authorize(Resource::Games, Action::Create).await?;
        self.session
            .fetch(ApiRequest::post("/jogos").json(request)?)
            .await
    }

    pub async fn update(&self, id: &str, request: &GameRequest) -> ClientResult<Game> {
        let id = validate_required("id", id)?;
        self.session.authorize(Resource::Games, Action::Update).await?;
        self.session
            .fetch(ApiRequest::put(format!("/jogos/{}", id)).json(request)?)
            .await
    }

    /// Flips a game between active and inactive.
    pub async fn toggle_status(&self, id: &str) -> ClientResult<Game> {
        let id = validate_required("id", id)?;
        self.session.authorize(Resource::Games, Action::Update).await?;
        let game: Game = self
            .session
            .fetch(ApiRequest::patch(format!("/jogos/{}/toggle-status", id)))
            .await?;

        info!(game_id = %game.id, active = game.active, "Game status toggled");
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::api::Method;
    use crate::error::ClientError;
    use crate::testing::{logged_in, MockApi};

    #[tokio::test]
    async fn test_toggle_status_uses_patch() {
        let api = Arc::new(MockApi::new());
        api.respond(
            "PATCH /jogos/g1/toggle-status",
            Ok(json!({ "id": "g1", "nome": "Quina", "preco": 2.5, "ativo": false })),
        );
        let sessions = logged_in(&api, "GERENTE").await;

        let game = sessions.games().toggle_status("g1").await.unwrap();
        assert!(!game.active);
        assert_eq!(game.price.cents(), 250);
        assert_eq!(api.requests().await.pop().unwrap().method, Method::Patch);
    }

    #[tokio::test]
    async fn test_seller_cannot_toggle() {
        let api = Arc::new(MockApi::new());
        let sessions = logged_in(&api, "VENDEDOR").await;
        assert!(matches!(
            sessions.games().toggle_status("g1").await,
            Err(ClientError::Forbidden { .. })
        ));
    }
}
