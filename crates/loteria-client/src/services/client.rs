//! Customers (`/clientes`).

use loteria_core::access::{Action, Resource};
use loteria_core::types::{Client, ClientRequest, Page};
use loteria_core::validation::validate_required;

use crate::api::{ApiRequest, PageRequest};
use crate::error::ClientResult;
use crate::session::SessionManager;

pub struct ClientService<'a> {
    session: &'a SessionManager,
}

impl<'a> ClientService<'a> {
    pub(crate) fn new(session: &'a SessionManager) -> Self {
        ClientService { session }
    }

    pub async fn list(&self, page: PageRequest) -> ClientResult<Page<Client>> {
        self.session.authorize(Resource::Clients, Action::Read).await?;
        self.session.fetch(ApiRequest::get("/clientes").paged(page)).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Client> {
        let id = validate_required("id", id)?;
        self.session.authorize(Resource::Clients, Action::Read).await?;
        self.session
            .fetch(ApiRequest::get(format!("/clientes/{}", id)))
            .await
    }

    /// Registers a customer; name and CPF are required.
    pub async fn create(&self, request: &ClientRequest) -> ClientResult<Client> {
        validate_required("nome", &request.name)?;
        validate_required("cpf", &request.cpf)?;
        self.session.authorize(Resource::Clients, Action::Create).await?;
        self.session
            .fetch(ApiRequest::post("/clientes").json(request)?)
            .await
    }

    pub async fn update(&self, id: &str, request: &ClientRequest) -> ClientResult<Client> {
        let id = validate_required("id", id)?;
        self.session.authorize(Resource::Clients, Action::Update).await?;
        self.session
            .fetch(ApiRequest::put(format!("/clientes/{}", id)).json(request)?)
            .await
    }
}
