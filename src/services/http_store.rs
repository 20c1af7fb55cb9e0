use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{AuthToken, Bill, CreatedBill, ReceiptUpload};
use crate::services::session::Session;
use crate::services::store::{Store, StoreError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5678";

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone, Copy, Default)]
struct HeaderOptions {
    no_content_type: bool,
    no_authorization: bool,
}

/// [`Store`] talking to the Billed REST backend.
pub struct HttpStore {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpStore {
    pub fn new(base_url: &str, session: Session) -> Self {
        HttpStore {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers(&self, options: HeaderOptions) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if !options.no_content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if !options.no_authorization {
            match self.session.token() {
                Ok(Some(jwt)) => match HeaderValue::from_str(&format!("Bearer {}", jwt)) {
                    Ok(value) => {
                        headers.insert(AUTHORIZATION, value);
                    }
                    Err(err) => warn!("Stored token is not a valid header: {}", err),
                },
                Ok(None) => {}
                Err(err) => warn!("Failed to read stored token: {}", err),
            }
        }
        headers
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request.send().await?;
        let response = error_for_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn error_for_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);
    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Decodes each record on its own so one unreadable bill does not hide the
/// rest of the batch.
fn decode_bills(records: Vec<Value>) -> Vec<Bill> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Bill>(record) {
            Ok(bill) => Some(bill),
            Err(err) => {
                warn!("Skipping unreadable bill: {}", err);
                None
            }
        })
        .collect()
}

#[async_trait]
impl Store for HttpStore {
    async fn list_bills(&self) -> Result<Vec<Bill>, StoreError> {
        let request = self
            .client
            .get(self.url("/bills"))
            .headers(self.headers(HeaderOptions::default()));
        let records: Vec<Value> = self.send(request).await?;
        let bills = decode_bills(records);
        debug!("Fetched {} bills", bills.len());
        Ok(bills)
    }

    async fn create_bill(&self, upload: ReceiptUpload) -> Result<CreatedBill, StoreError> {
        let part = Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = Form::new().part("file", part).text("email", upload.email);
        let request = self
            .client
            .post(self.url("/bills"))
            .headers(self.headers(HeaderOptions {
                no_content_type: true,
                ..HeaderOptions::default()
            }))
            .multipart(form);
        self.send(request).await
    }

    async fn update_bill(&self, selector: &str, data: &str) -> Result<Bill, StoreError> {
        let request = self
            .client
            .patch(self.url(&format!("/bills/{}", selector)))
            .headers(self.headers(HeaderOptions::default()))
            .body(data.to_string());
        self.send(request).await
    }

    async fn login(&self, credentials: &str) -> Result<AuthToken, StoreError> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .headers(self.headers(HeaderOptions {
                no_authorization: true,
                ..HeaderOptions::default()
            }))
            .body(credentials.to_string());
        self.send(request).await
    }

    async fn create_user(&self, data: &str) -> Result<(), StoreError> {
        let request = self
            .client
            .post(self.url("/users"))
            .headers(self.headers(HeaderOptions::default()))
            .body(data.to_string());
        let response = request.send().await?;
        error_for_status(response).await?;
        Ok(())
    }
}
