//! Client for the Plaid financial data API.
//!
//! Only the four endpoints this service needs are wrapped. Every call is a
//! JSON `POST` carrying `client_id` and `secret` in the body, sent through a
//! shared `reqwest::Client` with a request timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::config::Config;
use crate::models::plaid::{
    AccountsGetRequest, AccountsGetResponse, LinkTokenCreateRequest, LinkTokenResponse,
    PlaidErrorBody, PublicTokenExchangeRequest, PublicTokenExchangeResponse, RemoteTransaction,
    TransactionsGetOptions, TransactionsGetRequest, TransactionsGetResponse,
};
use crate::services::transaction_service::TransactionWindow;

/// Maximum number of transactions requested per call.
pub const TRANSACTIONS_PAGE_SIZE: u32 = 100;

/// Errors from the financial data API.
#[derive(Debug, thiserror::Error)]
pub enum PlaidError {
    /// Connection failure, timeout, or undecodable response body.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Plaid answered with a non-2xx status.
    #[error("Plaid returned {status} ({error_type}/{error_code}): {error_message}")]
    Api {
        status: u16,
        error_type: String,
        error_code: String,
        error_message: String,
    },

    /// The configured base URL cannot be joined with an endpoint path.
    #[error("Invalid Plaid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl PlaidError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, PlaidError::Transport(e) if e.is_timeout())
    }
}

/// Operations of the remote financial data API used by this service.
#[async_trait]
pub trait FinancialClient: Send + Sync {
    /// Start a Link flow for `user_id`.
    async fn create_link_token(&self, user_id: &str) -> Result<LinkTokenResponse, PlaidError>;

    /// Exchange a short-lived public token for a durable access token.
    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<PublicTokenExchangeResponse, PlaidError>;

    /// List the accounts of the Item behind `access_token`.
    async fn get_accounts(&self, access_token: &str)
    -> Result<Vec<serde_json::Value>, PlaidError>;

    /// List transactions of the Item behind `access_token` within `window`.
    async fn get_transactions(
        &self,
        access_token: &str,
        window: &TransactionWindow,
    ) -> Result<Vec<RemoteTransaction>, PlaidError>;
}

/// Request body with the API credentials prepended.
#[derive(Serialize)]
struct Authenticated<'a, T: Serialize> {
    client_id: &'a str,
    secret: &'a str,
    #[serde(flatten)]
    body: &'a T,
}

/// HTTP client for the Plaid REST API.
#[derive(Clone)]
pub struct PlaidClient {
    http: reqwest::Client,
    base_url: Url,
    client_id: String,
    secret: String,
    client_name: String,
}

impl PlaidClient {
    /// Build a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the
    /// environment base URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self, PlaidError> {
        Self::with_base_url(
            config.plaid_env.base_url(),
            &config.plaid_client_id,
            &config.plaid_secret,
            &config.link_client_name,
            config.plaid_timeout(),
        )
    }

    /// Build a client against an explicit API root.
    pub fn with_base_url(
        base_url: &str,
        client_id: &str,
        secret: &str,
        client_name: &str,
        timeout: Duration,
    ) -> Result<Self, PlaidError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            client_id: client_id.to_string(),
            secret: secret.to_string(),
            client_name: client_name.to_string(),
        })
    }

    /// Send an authenticated `POST` to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// - `Api` when Plaid answers with a non-2xx status (error body parsed when possible)
    /// - `Transport` on connection failure, timeout, or an undecodable body
    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, PlaidError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        let payload = Authenticated {
            client_id: &self.client_id,
            secret: &self.secret,
            body,
        };

        let response = self.http.post(url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error = response.json::<PlaidErrorBody>().await.unwrap_or_default();
            return Err(PlaidError::Api {
                status: status.as_u16(),
                error_type: error.error_type,
                error_code: error.error_code,
                error_message: error.error_message,
            });
        }

        Ok(response.json::<Resp>().await?)
    }
}

#[async_trait]
impl FinancialClient for PlaidClient {
    async fn create_link_token(&self, user_id: &str) -> Result<LinkTokenResponse, PlaidError> {
        let request = LinkTokenCreateRequest::for_user(&self.client_name, user_id);

        self.post("/link/token/create", &request).await
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<PublicTokenExchangeResponse, PlaidError> {
        let request = PublicTokenExchangeRequest {
            public_token: public_token.to_string(),
        };

        self.post("/item/public_token/exchange", &request).await
    }

    async fn get_accounts(
        &self,
        access_token: &str,
    ) -> Result<Vec<serde_json::Value>, PlaidError> {
        let request = AccountsGetRequest {
            access_token: access_token.to_string(),
        };

        let response: AccountsGetResponse = self.post("/accounts/get", &request).await?;

        Ok(response.accounts)
    }

    async fn get_transactions(
        &self,
        access_token: &str,
        window: &TransactionWindow,
    ) -> Result<Vec<RemoteTransaction>, PlaidError> {
        let request = TransactionsGetRequest {
            access_token: access_token.to_string(),
            start_date: window.start_date,
            end_date: window.end_date,
            options: TransactionsGetOptions {
                count: TRANSACTIONS_PAGE_SIZE,
                offset: 0,
                account_ids: window.account_id.clone().map(|id| vec![id]),
            },
        };

        let response: TransactionsGetResponse = self.post("/transactions/get", &request).await?;

        Ok(response.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(url: &str, timeout: Duration) -> PlaidClient {
        PlaidClient::with_base_url(url, "client-1", "secret-1", "PennyPilot", timeout).unwrap()
    }

    #[tokio::test]
    async fn test_exchange_decodes_access_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/item/public_token/exchange")
            .match_body(Matcher::PartialJson(json!({
                "client_id": "client-1",
                "secret": "secret-1",
                "public_token": "public-sandbox-1"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "access-sandbox-1", "item_id": "item-1", "request_id": "r1"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url(), Duration::from_secs(5));
        let exchange = client
            .exchange_public_token("public-sandbox-1")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(exchange.access_token, "access-sandbox-1");
        assert_eq!(exchange.item_id, "item-1");
    }

    #[tokio::test]
    async fn test_error_body_becomes_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/item/public_token/exchange")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "error_type": "INVALID_INPUT",
                    "error_code": "INVALID_PUBLIC_TOKEN",
                    "error_message": "provided public token is expired",
                    "display_message": null,
                    "request_id": "r2"
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url(), Duration::from_secs(5));
        let err = client
            .exchange_public_token("public-sandbox-old")
            .await
            .err()
            .unwrap();

        match err {
            PlaidError::Api {
                status,
                error_type,
                error_code,
                error_message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(error_type, "INVALID_INPUT");
                assert_eq!(error_code, "INVALID_PUBLIC_TOKEN");
                assert_eq!(error_message, "provided public token is expired");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body_still_reports_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/accounts/get")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = client_for(&server.url(), Duration::from_secs(5));
        let err = client.get_accounts("access-sandbox-1").await.err().unwrap();

        assert!(matches!(err, PlaidError::Api { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_transactions_request_carries_credentials_and_account() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/transactions/get")
            .match_body(Matcher::PartialJson(json!({
                "client_id": "client-1",
                "secret": "secret-1",
                "access_token": "access-sandbox-1",
                "start_date": "2025-01-01",
                "end_date": "2025-01-31",
                "options": {"count": 100, "offset": 0, "account_ids": ["acc-9"]}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "accounts": [],
                    "transactions": [{"amount": 12.5, "name": "Coffee"}],
                    "total_transactions": 1
                }"#,
            )
            .create_async()
            .await;

        let window = TransactionWindow {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            account_id: Some("acc-9".to_string()),
        };
        let client = client_for(&server.url(), Duration::from_secs(5));
        let transactions = client
            .get_transactions("access-sandbox-1", &window)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 12.5);
        assert_eq!(transactions[0].details["name"], "Coffee");
    }

    #[tokio::test]
    async fn test_slow_response_is_timeout() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let client = client_for(&format!("http://{}", addr), Duration::from_millis(200));
        let err = client.get_accounts("access-sandbox-1").await.err().unwrap();

        assert!(err.is_timeout());
        assert!(matches!(err, PlaidError::Transport(_)));
    }

    #[test]
    fn test_authenticated_body_flattens_request() {
        let request = PublicTokenExchangeRequest {
            public_token: "public-sandbox-1".to_string(),
        };
        let payload = Authenticated {
            client_id: "client",
            secret: "secret",
            body: &request,
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "client_id": "client",
                "secret": "secret",
                "public_token": "public-sandbox-1"
            })
        );
    }

    #[test]
    fn test_endpoint_urls_join_base() {
        let base = Url::parse("https://sandbox.plaid.com").unwrap();

        assert_eq!(
            base.join("/item/public_token/exchange").unwrap().as_str(),
            "https://sandbox.plaid.com/item/public_token/exchange"
        );
    }

    #[test]
    fn test_api_error_is_not_timeout() {
        let err = PlaidError::Api {
            status: 400,
            error_type: "ITEM_ERROR".to_string(),
            error_code: "ITEM_LOGIN_REQUIRED".to_string(),
            error_message: "login required".to_string(),
        };

        assert!(!err.is_timeout());
    }
}
