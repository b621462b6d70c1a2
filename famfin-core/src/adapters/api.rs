//! Family finance REST API client
//!
//! Thin async wrapper over the server's JSON endpoints. The client holds no
//! credentials: every authenticated call takes the bearer token explicitly.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::result::{Error, Result};
use crate::domain::{
    BearerToken, DashboardPeriod, Family, MonthlyStats, NewTransaction, Summary, Transaction,
    TransactionFilter, UserProfile,
};

/// Default API host
pub const DEFAULT_BASE_URL: &str = "http://172.20.10.3:5000/api";

/// Environment variable overriding the configured API base URL
pub const API_URL_ENV: &str = "FAMFIN_API_URL";

/// Successful login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Error body shape used by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordChange<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

/// API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://host:5000/api`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(Error::config("API base URL cannot be empty"));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder, token: &BearerToken) -> RequestBuilder {
        request.bearer_auth(token.as_str())
    }

    /// Send a request and turn non-2xx statuses into `Error::Api`
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.execute(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| Error::Other(format!("Failed to parse API response: {}", e.without_url())))
    }

    /// Map transport errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Network(format!(
                "Connection timed out after {} seconds",
                self.timeout.as_secs()
            ))
        } else if error.is_connect() {
            Error::Network(format!("Unable to connect to {}", self.base_url))
        } else {
            Error::Network(format!("Request failed: {}", error.without_url()))
        }
    }

    // === Auth ===

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&Credentials { email, password });
        self.fetch_json(request).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let request = self.client.post(self.url("/auth/register")).json(&Registration {
            name,
            email,
            password,
        });
        self.execute(request).await.map(|_| ())
    }

    pub async fn change_password(
        &self,
        token: &BearerToken,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let request = self
            .client
            .post(self.url("/auth/change-password"))
            .json(&PasswordChange {
                old_password,
                new_password,
            });
        self.execute(self.authorized(request, token)).await.map(|_| ())
    }

    // === Transactions ===

    pub async fn list_transactions(
        &self,
        token: &BearerToken,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        let request = self
            .client
            .get(self.url("/transactions"))
            .query(&filter.query_pairs());
        self.fetch_json(self.authorized(request, token)).await
    }

    pub async fn create_transaction(
        &self,
        token: &BearerToken,
        transaction: &NewTransaction,
    ) -> Result<()> {
        let request = self.client.post(self.url("/transactions")).json(transaction);
        self.execute(self.authorized(request, token)).await.map(|_| ())
    }

    pub async fn update_transaction(
        &self,
        token: &BearerToken,
        id: &str,
        transaction: &NewTransaction,
    ) -> Result<()> {
        let request = self
            .client
            .put(self.url(&format!("/transactions/{}", id)))
            .json(transaction);
        self.execute(self.authorized(request, token)).await.map(|_| ())
    }

    pub async fn delete_transaction(&self, token: &BearerToken, id: &str) -> Result<()> {
        let request = self.client.delete(self.url(&format!("/transactions/{}", id)));
        self.execute(self.authorized(request, token)).await.map(|_| ())
    }

    // === Family aggregates ===

    pub async fn family_summary(&self, token: &BearerToken) -> Result<Summary> {
        let request = self.client.get(self.url("/transactions/family/summary"));
        self.fetch_json(self.authorized(request, token)).await
    }

    pub async fn recent_transactions(&self, token: &BearerToken) -> Result<Vec<Transaction>> {
        let request = self.client.get(self.url("/transactions/family/recent"));
        self.fetch_json(self.authorized(request, token)).await
    }

    pub async fn monthly_stats(
        &self,
        token: &BearerToken,
        period: DashboardPeriod,
    ) -> Result<MonthlyStats> {
        let request = self
            .client
            .get(self.url("/transactions/family/monthly-stats"))
            .query(&[("months", period.months())]);
        self.fetch_json(self.authorized(request, token)).await
    }

    // === Family ===

    /// The caller's family; `None` when the server answers 404
    pub async fn my_family(&self, token: &BearerToken) -> Result<Option<Family>> {
        let request = self.client.get(self.url("/family/my-family"));
        match self.fetch_json(self.authorized(request, token)).await {
            Ok(family) => Ok(Some(family)),
            Err(Error::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_family(&self, token: &BearerToken, name: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url("/family/create"))
            .json(&json!({ "name": name }));
        self.execute(self.authorized(request, token)).await.map(|_| ())
    }

    pub async fn join_family(&self, token: &BearerToken, invite_code: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url("/family/join"))
            .json(&json!({ "inviteCode": invite_code }));
        self.execute(self.authorized(request, token)).await.map(|_| ())
    }

    pub async fn leave_family(&self, token: &BearerToken) -> Result<()> {
        let request = self.client.post(self.url("/family/leave")).json(&json!({}));
        self.execute(self.authorized(request, token)).await.map(|_| ())
    }
}
