//! # Domain Types
//!
//! Wire DTOs exchanged with the Loteria360 REST API.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     User        │   │    CashBox      │   │   CashCount     │       │
//! │  │  (usuário)      │   │   (caixa)       │   │  (contagem)     │       │
//! │  │  papel: Role    │   │  numero, ativo  │   │  valorInicial   │       │
//! │  └─────────────────┘   └─────────────────┘   │  valorFinal     │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Game        │   │     Sale        │   │     Pool        │       │
//! │  │   (jogo)        │   │ (venda-caixa)   │   │   (bolão)       │       │
//! │  │  preco          │   │  precoTotal     │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Client (cliente) • DashboardMetrics • Page<T> • ApiErrorBody          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Conventions
//! - Field names are the back-end's camelCase Portuguese names
//! - Monetary fields are JSON decimal numbers, read into [`Money`] once at
//!   this boundary
//! - Audit timestamps (`criadoEm`, `atualizadoEm`) are kept as the strings the
//!   back-end sends

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::access::Role;
use crate::money::{self, Money};

// =============================================================================
// Authentication
// =============================================================================

/// A back-end user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "papel")]
    pub role: Role,
    #[serde(rename = "ativo", default = "default_true")]
    pub active: bool,
    #[serde(rename = "criadoEm", default)]
    pub created_at: String,
    #[serde(rename = "atualizadoEm", default)]
    pub updated_at: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Response of `POST /auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Cash Box & Count
// =============================================================================

/// A physical register (caixa).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashBox {
    pub id: String,
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "numero", default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "ativo", default = "default_true")]
    pub active: bool,
    #[serde(rename = "criadoEm", default)]
    pub created_at: String,
    #[serde(rename = "atualizadoEm", default)]
    pub updated_at: String,
}

impl CashBox {
    /// Text shown in the box picker: `Caixa 3 - Loja centro`.
    pub fn label(&self) -> String {
        let number = self
            .number
            .map(|n| n.to_string())
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| self.id.clone());
        let description = self.description.as_deref().unwrap_or("Sem descrição");
        format!("Caixa {} - {}", number, description)
    }
}

/// A stored cash count as returned by `/contagem-caixa`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashCount {
    pub id: String,
    #[serde(rename = "caixaId")]
    pub box_id: String,
    #[serde(rename = "dataContagem")]
    #[ts(as = "String")]
    pub count_date: NaiveDate,
    #[serde(rename = "valorInicial", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub opening_amount: Money,
    #[serde(rename = "valorFinal", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub closing_amount: Money,
    #[serde(rename = "diferenca", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub difference: Money,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "responsavelId", default)]
    pub responsible_id: String,
    #[serde(rename = "criadoEm", default)]
    pub created_at: String,
    #[serde(rename = "atualizadoEm", default)]
    pub updated_at: String,
}

impl CashCount {
    /// True when the stored difference matches `closing - opening`.
    pub fn is_balanced(&self) -> bool {
        self.closing_amount - self.opening_amount == self.difference
    }
}

// =============================================================================
// Games
// =============================================================================

/// A lottery game (jogo) on sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Game {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "preco", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub price: Money,
    #[serde(rename = "ativo", default = "default_true")]
    pub active: bool,
    #[serde(rename = "criadoEm", default)]
    pub created_at: String,
    #[serde(rename = "atualizadoEm", default)]
    pub updated_at: String,
}

/// Body of `POST /jogos` and `PUT /jogos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "preco", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub price: Money,
    #[serde(rename = "ativo")]
    pub active: bool,
}

// =============================================================================
// Clients
// =============================================================================

/// A registered customer (cliente).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Client {
    pub id: String,
    #[serde(flatten)]
    pub details: ClientRequest,
    #[serde(rename = "criadoEm", default)]
    pub created_at: String,
    #[serde(rename = "atualizadoEm", default)]
    pub updated_at: String,
}

/// Editable client fields; body of `POST /clientes` and `PUT /clientes/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "endereco", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "cidade", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(rename = "dataNascimento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "consentimentoLgpd", default)]
    pub lgpd_consent: bool,
}

impl Client {
    /// CPF as `000.000.000-00`; returned unchanged unless it is 11 digits.
    ///
    /// ## Example
    /// ```rust
    /// use loteria_core::types::format_cpf;
    ///
    /// assert_eq!(format_cpf("12345678901"), "123.456.789-01");
    /// assert_eq!(format_cpf("123"), "123");
    /// ```
    pub fn formatted_cpf(&self) -> String {
        format_cpf(&self.details.cpf)
    }
}

/// Formats an 11-digit CPF with its punctuation.
pub fn format_cpf(cpf: &str) -> String {
    if cpf.len() != 11 || !cpf.bytes().all(|b| b.is_ascii_digit()) {
        return cpf.to_string();
    }
    format!("{}.{}.{}-{}", &cpf[0..3], &cpf[3..6], &cpf[6..9], &cpf[9..11])
}

// =============================================================================
// Sales
// =============================================================================

/// A recorded sale (venda-caixa).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    #[serde(rename = "caixaId")]
    pub box_id: String,
    #[serde(rename = "jogoId")]
    pub game_id: String,
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "precoUnitario", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub unit_price: Money,
    #[serde(rename = "precoTotal", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub total_price: Money,
    #[serde(rename = "dataVenda")]
    pub sale_date: String,
    #[serde(rename = "vendedorId", default)]
    pub seller_id: String,
    #[serde(rename = "clienteId", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(rename = "criadoEm", default)]
    pub created_at: String,
    #[serde(rename = "atualizadoEm", default)]
    pub updated_at: String,
}

// =============================================================================
// Pools
// =============================================================================

/// Lifecycle of a pool (bolão).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PoolStatus {
    #[serde(rename = "ABERTO")]
    Open,
    #[serde(rename = "ENCERRADO")]
    Closed,
    #[serde(rename = "CANCELADO")]
    Cancelled,
}

impl Default for PoolStatus {
    fn default() -> Self {
        PoolStatus::Open
    }
}

/// A shared bet (bolão).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Pool {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "valorAposta", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub stake: Money,
    #[serde(rename = "quantidadeNumeros")]
    pub numbers_count: u32,
    #[serde(rename = "dataInicio")]
    pub starts_on: String,
    #[serde(rename = "dataFim")]
    pub ends_on: String,
    #[serde(default)]
    pub status: PoolStatus,
    #[serde(rename = "criadoEm", default)]
    pub created_at: String,
    #[serde(rename = "atualizadoEm", default)]
    pub updated_at: String,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Response of `GET /dashboard/metrics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardMetrics {
    #[serde(rename = "totalVendas")]
    pub total_sales: u64,
    #[serde(rename = "totalValor", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub total_amount: Money,
    #[serde(rename = "totalVendasHoje")]
    pub sales_today: u64,
    #[serde(rename = "totalValorHoje", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub amount_today: Money,
    #[serde(rename = "totalClientes")]
    pub total_clients: u64,
    #[serde(rename = "totalUsuarios")]
    pub total_users: u64,
    #[serde(rename = "totalJogos")]
    pub total_games: u64,
    #[serde(rename = "totalBoloes")]
    pub total_pools: u64,
    #[serde(rename = "vendasPorJogo", default)]
    pub sales_by_game: Vec<GameSales>,
    #[serde(rename = "vendasPorCaixa", default)]
    pub sales_by_box: Vec<BoxSales>,
    #[serde(rename = "vendasPorDia", default)]
    pub sales_by_day: Vec<DailySales>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSales {
    #[serde(rename = "jogo")]
    pub game: String,
    #[serde(rename = "quantidade")]
    pub quantity: u64,
    #[serde(rename = "valor", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BoxSales {
    #[serde(rename = "caixa")]
    pub cash_box: String,
    #[serde(rename = "quantidade")]
    pub quantity: u64,
    #[serde(rename = "valor", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySales {
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "quantidade")]
    pub quantity: u64,
    #[serde(rename = "valor", with = "money::as_decimal")]
    #[ts(type = "number")]
    pub amount: Money,
}

// =============================================================================
// Paging & Errors
// =============================================================================

/// A page of a listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    pub number: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    /// Index of the following page, if any.
    pub fn next_page(&self) -> Option<u32> {
        (!self.last).then(|| self.number + 1)
    }
}

/// Error body the back-end sends with non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// One rejected field in an [`ApiErrorBody`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_backend() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "nome": "Ana",
            "email": "ana@loteria.com",
            "papel": "GERENTE",
            "ativo": true,
            "criadoEm": "2024-01-01T10:00:00",
            "atualizadoEm": "2024-01-02T10:00:00"
        }))
        .unwrap();

        assert_eq!(user.role, Role::Manager);
        assert_eq!(user.name, "Ana");
        assert!(user.active);
    }

    #[test]
    fn test_login_request_uses_senha() {
        let body = serde_json::to_value(LoginRequest {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({ "email": "a@b.com", "senha": "x" }));
    }

    #[test]
    fn test_game_price_is_exact() {
        let game: Game = serde_json::from_value(json!({
            "id": "g1", "nome": "Mega-Sena", "descricao": "", "preco": 5.0, "ativo": true
        }))
        .unwrap();
        assert_eq!(game.price, Money::from_cents(500));

        let game: Game = serde_json::from_value(json!({
            "id": "g2", "nome": "Lotofácil", "preco": 3.1
        }))
        .unwrap();
        assert_eq!(game.price.cents(), 310);
    }

    #[test]
    fn test_cash_count_balance() {
        let count: CashCount = serde_json::from_value(json!({
            "id": "c1",
            "caixaId": "b1",
            "dataContagem": "2024-05-01",
            "valorInicial": 100.0,
            "valorFinal": 350.25,
            "diferenca": 250.25,
            "responsavelId": "u1"
        }))
        .unwrap();
        assert!(count.is_balanced());
        assert_eq!(count.count_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_client_flattened_details() {
        let client: Client = serde_json::from_value(json!({
            "id": "cl1",
            "nome": "João",
            "cpf": "12345678901",
            "telefone": "11999999999",
            "consentimentoLgpd": true
        }))
        .unwrap();
        assert_eq!(client.formatted_cpf(), "123.456.789-01");
        assert_eq!(client.details.phone.as_deref(), Some("11999999999"));
        assert!(client.details.email.is_none());
        assert!(client.details.lgpd_consent);
    }

    #[test]
    fn test_cash_box_label() {
        let cash_box = CashBox {
            id: "b1".to_string(),
            name: None,
            number: Some(3),
            description: None,
            active: true,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(cash_box.label(), "Caixa 3 - Sem descrição");
    }

    #[test]
    fn test_pool_status_wire_names() {
        assert_eq!(serde_json::to_value(PoolStatus::Closed).unwrap(), json!("ENCERRADO"));
        let status: PoolStatus = serde_json::from_value(json!("CANCELADO")).unwrap();
        assert_eq!(status, PoolStatus::Cancelled);
    }

    #[test]
    fn test_page_and_error_body() {
        let page: Page<Game> = serde_json::from_value(json!({
            "content": [],
            "totalElements": 41,
            "totalPages": 3,
            "size": 20,
            "number": 1,
            "first": false,
            "last": false
        }))
        .unwrap();
        assert_eq!(page.next_page(), Some(2));

        let body: ApiErrorBody = serde_json::from_value(json!({
            "detail": "Dados inválidos",
            "errors": [{ "field": "cpf", "message": "CPF inválido" }]
        }))
        .unwrap();
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].field, "cpf");

        let body: ApiErrorBody = serde_json::from_value(json!({ "detail": "x" })).unwrap();
        assert!(body.errors.is_empty());
    }
}
