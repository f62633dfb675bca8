//! Tiffin API Client

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use mockall::automock;
use reqwest::{Client, RequestBuilder, Response, header::ACCEPT};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;

mod error;
mod models;

pub use error::ApiError;
pub use models::*;

/// Menu endpoints.
#[automock]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Every dish on the menu.
    async fn list_foods(&self) -> Result<Vec<FoodItem>, ApiError>;
}

/// Server cart endpoints.
#[automock]
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Add a line to the caller's cart and return the whole cart.
    async fn add_to_cart(&self, token: &str, item: &AddToCart) -> Result<ServerCart, ApiError>;

    /// Overwrite the quantity of a line already in the caller's cart and
    /// return the whole cart.
    async fn update_cart(
        &self,
        token: &str,
        update: &UpdateCart,
    ) -> Result<ServerCart, ApiError>;

    /// The caller's cart. A 404 means the cart is empty.
    async fn get_cart(&self, token: &str, user: Uuid) -> Result<ServerCart, ApiError>;
}

/// Payment endpoints.
#[automock]
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// Record a payment. Never retried automatically.
    async fn save_payment(
        &self,
        token: &str,
        payment: &SavePayment,
    ) -> Result<PaymentSaved, ApiError>;
}

/// HTTP client for the Tiffin JSON API.
///
/// Every request is bounded by the configured timeout. GETs are retried on
/// transport failures and 5xx responses; writes are sent exactly once.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    get_retries: usize,
}

impl ApiClient {
    /// Build a client from settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            get_retries: config.get_retries,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_delay(Duration::from_secs(2))
            .with_max_times(self.get_retries)
            .with_jitter()
    }

    async fn get_json<T>(&self, path: &str, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);

        (|| async {
            let request = self.http.get(&url);

            send(with_token(request, token)).await
        })
        .retry(self.backoff())
        .when(ApiError::is_retryable)
        .notify(|error, delay| warn!(%url, ?delay, "retrying GET after error: {error}"))
        .await
    }

    async fn post_json<B, T>(&self, path: &str, token: Option<&str>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);

        send(with_token(request, token)).await
    }
}

fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.header(ACCEPT, "application/json").send().await?;

    if response.status().is_success() {
        return Ok(response.json().await?);
    }

    Err(status_error(response).await)
}

/// Prefer the server's brief; fall back to the status reason.
async fn status_error(response: Response) -> ApiError {
    let status = response.status();

    let message = match response.json::<ErrorEnvelope>().await {
        Ok(body) => body.error.brief,
        Err(error) => {
            debug!("error response without a JSON body: {error}");

            status.canonical_reason().unwrap_or_default().to_string()
        }
    };

    ApiError::Status { status, message }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn list_foods(&self) -> Result<Vec<FoodItem>, ApiError> {
        let envelope: FoodsEnvelope = self.get_json("getAllFoods", None).await?;

        Ok(envelope.food_items)
    }
}

#[async_trait]
impl CartApi for ApiClient {
    async fn add_to_cart(&self, token: &str, item: &AddToCart) -> Result<ServerCart, ApiError> {
        self.post_json("addToCart", Some(token), item).await
    }

    async fn update_cart(
        &self,
        token: &str,
        update: &UpdateCart,
    ) -> Result<ServerCart, ApiError> {
        self.post_json("updateCart", Some(token), update).await
    }

    async fn get_cart(&self, token: &str, user: Uuid) -> Result<ServerCart, ApiError> {
        self.get_json(&format!("getCart/{user}"), Some(token)).await
    }
}

#[async_trait]
impl CheckoutApi for ApiClient {
    async fn save_payment(
        &self,
        token: &str,
        payment: &SavePayment,
    ) -> Result<PaymentSaved, ApiError> {
        self.post_json("savepayment", Some(token), payment).await
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn client(api_url: &str, get_retries: usize) -> TestResult<ApiClient> {
        Ok(ApiClient::new(&ClientConfig {
            api_url: api_url.to_string(),
            timeout_seconds: 2,
            get_retries,
            ..ClientConfig::default()
        })?)
    }

    #[test]
    fn urls_join_with_a_single_slash() -> TestResult {
        let client = client("http://localhost:9000/", 0)?;

        assert_eq!(client.url("getAllFoods"), "http://localhost:9000/getAllFoods");
        assert_eq!(client.url("/getCart/1"), "http://localhost:9000/getCart/1");

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_server_is_a_retryable_error() -> TestResult {
        let client = client("http://127.0.0.1:1", 0)?;

        let error = client.list_foods().await.err();

        assert!(
            error.as_ref().is_some_and(ApiError::is_retryable),
            "unexpected result: {error:?}"
        );

        Ok(())
    }
}
