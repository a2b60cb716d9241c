//! Authenticated HTTP client for the CEPE backend.
//!
//! Thin wrapper over reqwest: bearer token via default headers, JSON in and
//! out, no caching and no retries. Every call is a single attempt; writes
//! never touch local state, callers re-fetch the affected list afterwards.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    CreateOrdemRequest, CreateUserRequest, KanbanBoard, LoginResponse, OrdemServico, User,
};

/// Generic fallback texts, used when the backend gives no message of its own.
pub const ERR_LOGIN: &str = "Erro ao fazer login";
pub const ERR_CONEXAO: &str = "Erro de conexão com o servidor";
pub const ERR_CRIAR_USUARIO: &str = "Erro ao criar usuário";
pub const ERR_CRIAR_OS: &str = "Erro ao criar OS";
pub const ERR_CARREGAR_USUARIOS: &str = "Erro ao carregar usuários";
pub const ERR_CARREGAR_ORDENS: &str = "Erro ao carregar ordens de serviço";
pub const ERR_CARREGAR_KANBAN: &str = "Erro ao carregar dados do kanban";

/// The two failure modes this client distinguishes. Neither is fatal; both
/// are shown next to whatever triggered the call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status. The message is the
    /// backend's own `{message}` body when present.
    #[error("{message}")]
    ServerRejected {
        status: StatusCode,
        message: String,
    },

    /// The request never produced an HTTP response (DNS, refused connection,
    /// timeout). Detail stays in the source chain; the display is generic.
    #[error("Erro de conexão com o servidor")]
    ConnectionFailed(#[source] reqwest::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::ConnectionFailed(err)
    }
}

/// Error body the backend uses for rejections.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn extract_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| fallback.to_string())
}

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client. The token, when given, is attached to every request
    /// as a bearer Authorization header.
    pub fn new(base_url: &str, timeout_secs: u64, token: Option<&str>) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token)
                    .parse()
                    .context("Invalid token format")?,
            );
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a response into `T` or a `ServerRejected` carrying the backend
    /// message (or `fallback` when the body has none).
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "Backend rejected request");
            Err(ClientError::ServerRejected {
                status,
                message: extract_message(&body, fallback),
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::read_json(response, fallback).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::read_json(response, fallback).await
    }

    /// Exchange credentials for a token and user snapshot. Persisting the
    /// resulting session is the caller's job.
    pub async fn login(&self, email: &str, senha: &str) -> Result<LoginResponse, ClientError> {
        #[derive(Serialize)]
        struct Credentials<'a> {
            email: &'a str,
            senha: &'a str,
        }
        self.post_json("/api/auth/login", &Credentials { email, senha }, ERR_LOGIN)
            .await
    }

    pub async fn list_ordens(&self) -> Result<Vec<OrdemServico>, ClientError> {
        self.get_json("/api/ordens-servico", ERR_CARREGAR_ORDENS)
            .await
    }

    pub async fn create_ordem(
        &self,
        request: &CreateOrdemRequest,
    ) -> Result<OrdemServico, ClientError> {
        self.post_json("/api/ordens-servico", request, ERR_CRIAR_OS)
            .await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.get_json("/api/users", ERR_CARREGAR_USUARIOS).await
    }

    pub async fn register_user(&self, request: &CreateUserRequest) -> Result<User, ClientError> {
        self.post_json("/api/auth/register", request, ERR_CRIAR_USUARIO)
            .await
    }

    pub async fn kanban(&self) -> Result<KanbanBoard, ClientError> {
        self.get_json("/api/kanban", ERR_CARREGAR_KANBAN).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_from_body() {
        let body = r#"{"message":"Email já cadastrado"}"#;
        assert_eq!(
            extract_message(body, ERR_CRIAR_USUARIO),
            "Email já cadastrado"
        );
    }

    #[test]
    fn test_extract_message_falls_back_on_empty_body() {
        assert_eq!(extract_message("", ERR_LOGIN), ERR_LOGIN);
    }

    #[test]
    fn test_extract_message_falls_back_on_missing_field() {
        assert_eq!(extract_message(r#"{"error":"nope"}"#, ERR_LOGIN), ERR_LOGIN);
    }

    #[test]
    fn test_server_rejected_displays_backend_message() {
        let err = ClientError::ServerRejected {
            status: StatusCode::UNAUTHORIZED,
            message: "Credenciais inválidas".to_string(),
        };
        assert_eq!(err.to_string(), "Credenciais inválidas");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:5000/", 30, None).unwrap();
        assert_eq!(
            client.url("/api/kanban"),
            "http://localhost:5000/api/kanban"
        );
    }

    #[test]
    fn test_bearer_token_accepted() {
        assert!(ApiClient::new("http://localhost:5000", 30, Some("abc123")).is_ok());
    }
}
