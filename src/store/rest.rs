//! A transaction store that talks to the hosted `transactions` table through
//! its PostgREST HTTP interface.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header};
use serde::Deserialize;
use serde_json::json;

use crate::{
    store::{StoreError, TransactionStore},
    transaction::{Category, Transaction},
};

const TRANSACTIONS_PATH: &str = "/rest/v1/transactions";

/// Reads and updates transactions in the hosted database.
///
/// The client is built once at startup and shared by every request, it needs
/// no teardown.
#[derive(Debug, Clone)]
pub struct RestStore {
    http_client: Client,
    base_url: String,
    api_key: String,
}

/// The error body PostgREST sends with unsuccessful responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl RestStore {
    /// Create a store for the project at `base_url`, authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, StoreError> {
        let http_client = Client::builder()
            .build()
            .map_err(|error| StoreError::Request(error.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
            api_key: api_key.trim().to_owned(),
        })
    }

    fn transactions_url(&self) -> String {
        format!("{}{TRANSACTIONS_PATH}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }
}

#[async_trait]
impl TransactionStore for RestStore {
    async fn get_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let request = self
            .http_client
            .get(self.transactions_url())
            .query(&[("select", "*"), ("order", "date.desc")]);

        let response = self.authorize(request).send().await?;
        let transactions = check_status(response).await?.json().await?;

        Ok(transactions)
    }

    async fn update_category(
        &self,
        transaction_id: &str,
        category: Category,
    ) -> Result<Vec<Transaction>, StoreError> {
        let request = self
            .http_client
            .patch(self.transactions_url())
            .query(&[("or", id_filter(transaction_id))])
            .header("Prefer", "return=representation")
            .json(&json!({ "category": category.as_str() }));

        let response = self.authorize(request).send().await?;
        let updated: Vec<Transaction> = check_status(response).await?.json().await?;

        if updated.is_empty() {
            tracing::warn!("No transaction matched the ID \"{transaction_id}\"");
        }

        Ok(updated)
    }
}

/// The PostgREST filter matching either the external ID or the primary key.
fn id_filter(transaction_id: &str) -> String {
    let quoted = quote_filter_value(transaction_id);
    format!("(truelayer_id.eq.{quoted},id.eq.{quoted})")
}

/// Double quote a value so reserved characters such as `,` and `)` are taken literally.
fn quote_filter_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|error_body| error_body.message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_owned()
            } else {
                body
            }
        });

    tracing::error!("The store responded with {status}: {message}");

    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}
