//! HTTP implementation of the remote API traits using reqwest

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::{Bank, BankApi, BankDraft, BankId, DomainError, IbanApi, IbanValidation};

/// Error body returned by the IBAN Validator API
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// Remote API client over HTTP
///
/// Maps permanent client errors to their tagged variants and leaves every
/// other error status on `DomainError::Api` so the retry classifier can see
/// it; network-level failures become `Transport` and are never retried.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_timeout(base_url, std::time::Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DomainError> {
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| DomainError::transport(format!("Failed to parse response: {}", e)))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DomainError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(body);

        Err(match status.as_u16() {
            404 => DomainError::not_found(message),
            409 => DomainError::conflict(message),
            400 | 422 => DomainError::validation(message),
            code => DomainError::api(code, message),
        })
    }

    fn transport(error: reqwest::Error) -> DomainError {
        DomainError::transport(format!("Request failed: {}", error))
    }
}

#[async_trait]
impl BankApi for HttpApiClient {
    async fn list_banks(&self) -> Result<Vec<Bank>, DomainError> {
        let response = self
            .client
            .get(self.url("/banks"))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }

    async fn get_bank(&self, id: BankId) -> Result<Bank, DomainError> {
        let response = self
            .client
            .get(self.url(&format!("/banks/{}", id)))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }

    async fn create_bank(&self, draft: &BankDraft) -> Result<Bank, DomainError> {
        let response = self
            .client
            .post(self.url("/banks"))
            .json(draft)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }

    async fn update_bank(&self, id: BankId, draft: &BankDraft) -> Result<Bank, DomainError> {
        let response = self
            .client
            .put(self.url(&format!("/banks/{}", id)))
            .json(draft)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }

    async fn delete_bank(&self, id: BankId) -> Result<(), DomainError> {
        let response = self
            .client
            .delete(self.url(&format!("/banks/{}", id)))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn search_banks(&self, name: &str) -> Result<Vec<Bank>, DomainError> {
        let response = self
            .client
            .get(self.url("/banks/search"))
            .query(&[("name", name)])
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }

    async fn banks_by_country(&self, country_code: &str) -> Result<Vec<Bank>, DomainError> {
        let response = self
            .client
            .get(self.url(&format!("/banks/country/{}", country_code)))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }
}

#[async_trait]
impl IbanApi for HttpApiClient {
    async fn validate_iban(&self, iban: &str) -> Result<IbanValidation, DomainError> {
        let response = self
            .client
            .post(self.url("/iban/validate"))
            .json(&json!({ "iban": iban }))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(response).await
    }
}
