//! # REST Transport
//!
//! The [`ApiClient`] capability and its `reqwest` implementation.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         HTTP Request Flow                               │
//! │                                                                         │
//! │  ApiRequest { method, path, query, body }                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HttpApiClient::send                                                   │
//! │       ├── base_url + path                                              │
//! │       ├── Authorization: Bearer <token>   (when a token is installed) │
//! │       └── JSON body                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Status mapping                                                        │
//! │       ├── 2xx       → JSON value (Null for an empty body)              │
//! │       ├── 401       → Unauthorized                                     │
//! │       ├── 403       → Forbidden { detail }                             │
//! │       └── otherwise → Api { status, detail, field_errors }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use loteria_core::types::ApiErrorBody;
use loteria_core::validation::validate_page_size;
use loteria_core::DEFAULT_PAGE_SIZE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Request
// =============================================================================

/// HTTP verb of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

/// One call to the REST API. `path` is relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attaches a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds `page` and `size`.
    pub fn paged(self, page: PageRequest) -> Self {
        self.query("page", page.page).query("size", page.size)
    }
}

/// Pagination of a listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Validates the page size (1..=100).
    pub fn new(page: u32, size: u32) -> ClientResult<Self> {
        validate_page_size(size)?;
        Ok(PageRequest { page, size })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

// =============================================================================
// ApiClient Capability
// =============================================================================

/// Something that can execute [`ApiRequest`]s.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Executes a request and returns the decoded JSON body.
    async fn send(&self, request: ApiRequest) -> ClientResult<Value>;

    /// Installs or clears the bearer token sent with every request.
    async fn set_token(&self, token: Option<String>);
}

/// Executes a request and decodes the body into `T`.
pub async fn fetch<T, A>(api: &A, request: ApiRequest) -> ClientResult<T>
where
    T: DeserializeOwned,
    A: ApiClient + ?Sized,
{
    let value = api.send(request).await?;
    Ok(serde_json::from_value(value)?)
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// [`ApiClient`] over `reqwest`.
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpApiClient {
    /// Creates a client for the configured base URL and timeout.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.api_timeout())
            .build()?;

        Ok(HttpApiClient {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn send(&self, request: ApiRequest) -> ClientResult<Value> {
        let mut builder = self
            .http
            .request(request.method.as_reqwest(), self.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.token.read().await.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        debug!(method = %request.method, path = %request.path, status, "API response");

        if (200..300).contains(&status) {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }

        let err = error_from_response(status, &text);
        warn!(method = %request.method, path = %request.path, status, error = %err, "API request failed");
        Err(err)
    }

    async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }
}

/// Maps a non-2xx response to a [`ClientError`].
///
/// The body is read as `{ detail, errors[] }`; an older `{ message }` shape
/// is accepted as the detail.
pub fn error_from_response(status: u16, body: &str) -> ClientError {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let mut parsed: ApiErrorBody = serde_json::from_value(value.clone()).unwrap_or_default();
    if parsed.detail.is_empty() {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            parsed.detail = message.to_string();
        }
    }

    match status {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden {
            detail: if parsed.detail.is_empty() {
                "Você não tem permissão para realizar esta ação".to_string()
            } else {
                parsed.detail
            },
        },
        _ => ClientError::Api {
            status,
            detail: parsed.detail,
            field_errors: parsed.errors,
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;

    /// One-request-per-connection HTTP server answering from `responses`.
    /// Resolves to the raw requests it received.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut seen = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                seen.push(read_request(&mut socket).await);

                let response = format!(
                    "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            seen
        });

        (format!("http://{}/api/v1", addr), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::get("/contagem-caixa/periodo")
            .query("dataInicio", "2024-05-01")
            .query("dataFim", "2024-05-31")
            .paged(PageRequest::default());

        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.query,
            vec![
                ("dataInicio".to_string(), "2024-05-01".to_string()),
                ("dataFim".to_string(), "2024-05-31".to_string()),
                ("page".to_string(), "0".to_string()),
                ("size".to_string(), "20".to_string()),
            ]
        );

        let request = ApiRequest::post("/jogos")
            .json(&serde_json::json!({ "nome": "Quina" }))
            .unwrap();
        assert_eq!(request.body, Some(serde_json::json!({ "nome": "Quina" })));
    }

    #[test]
    fn test_page_request_validation() {
        assert!(PageRequest::new(2, 50).is_ok());
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(0, 500).is_err());
    }

    #[test]
    fn test_url_join() {
        let config = ClientConfig {
            api_base_url: "http://localhost:8080/api/v1/".to_string(),
            ..ClientConfig::default()
        };
        let client = HttpApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
        assert_eq!(client.url("/caixas/ativas"), "http://localhost:8080/api/v1/caixas/ativas");
        assert_eq!(client.url("jogos"), "http://localhost:8080/api/v1/jogos");
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(error_from_response(401, ""), ClientError::Unauthorized));

        match error_from_response(403, r#"{"detail":"Somente administradores"}"#) {
            ClientError::Forbidden { detail } => assert_eq!(detail, "Somente administradores"),
            other => panic!("unexpected {:?}", other),
        }
        match error_from_response(403, "") {
            ClientError::Forbidden { detail } => assert!(detail.starts_with("Você não tem")),
            other => panic!("unexpected {:?}", other),
        }

        match error_from_response(
            422,
            r#"{"detail":"Dados inválidos","errors":[{"field":"cpf","message":"CPF inválido"}]}"#,
        ) {
            ClientError::Api {
                status,
                detail,
                field_errors,
            } => {
                assert_eq!(status, 422);
                assert_eq!(detail, "Dados inválidos");
                assert_eq!(field_errors[0].message, "CPF inválido");
            }
            other => panic!("unexpected {:?}", other),
        }

        match error_from_response(400, r#"{"message":"Formato antigo"}"#) {
            ClientError::Api { detail, .. } => assert_eq!(detail, "Formato antigo"),
            other => panic!("unexpected {:?}", other),
        }

        let err = error_from_response(503, "<html>Bad Gateway</html>");
        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_send_over_http() {
        let (base_url, server) = serve(vec![
            (200, r#"{"ok":true}"#),
            (200, ""),
            (401, ""),
            (422, r#"{"detail":"Dados inválidos","errors":[{"field":"cpf","message":"CPF inválido"}]}"#),
        ])
        .await;

        let config = ClientConfig {
            api_base_url: base_url,
            ..ClientConfig::default()
        };
        let client = HttpApiClient::new(&config).unwrap();
        client.set_token(Some("t1".to_string())).await;

        let value = client
            .send(ApiRequest::get("/jogos").paged(PageRequest::default()))
            .await
            .unwrap();
        assert_eq!(value, json!({ "ok": true }));

        let value = client.send(ApiRequest::post("/auth/logout")).await.unwrap();
        assert_eq!(value, Value::Null);

        assert!(matches!(
            client.send(ApiRequest::get("/caixas")).await,
            Err(ClientError::Unauthorized)
        ));

        client.set_token(None).await;
        let request = ApiRequest::post("/clientes")
            .json(&json!({ "nome": "Ana" }))
            .unwrap();
        match client.send(request).await {
            Err(ClientError::Api {
                status,
                detail,
                field_errors,
            }) => {
                assert_eq!(status, 422);
                assert_eq!(detail, "Dados inválidos");
                assert_eq!(field_errors[0].field, "cpf");
            }
            other => panic!("unexpected {:?}", other),
        }

        let seen = server.await.unwrap();
        assert!(seen[0].starts_with("GET /api/v1/jogos?page=0&size=20 HTTP/1.1"));
        assert!(seen[0].to_ascii_lowercase().contains("authorization: bearer t1"));
        assert!(seen[1].starts_with("POST /api/v1/auth/logout "));
        assert!(!seen[3].to_ascii_lowercase().contains("authorization:"));
        assert!(seen[3].ends_with(r#"{"nome":"Ana"}"#));
    }
}
