//! Client for the wallets REST API

use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Client, Method, Request};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

const API_KEY_HEADER: &str = "x-api-key";

/// Body of a wallet status patch flagging the wallet as errored
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletStatusErrorPatchRequest {
    status: &'static str,
    details: WalletStatusErrorPatchDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletStatusErrorPatchDetails {
    reason: String,
}

/// Errors raised when patching a wallet status
#[derive(Debug, Error)]
pub enum WalletPatchError {
    /// The server answered with a non-success status code
    #[error("wallet status patch was rejected with HTTP {0}")]
    ErrorResponse(u16),
    /// The request never made it to the server
    #[error("wallet status patch could not be delivered")]
    Transport(#[from] hyper::Error),
    /// The request could not be constructed
    #[error("wallet status patch request could not be built")]
    InvalidRequest(#[from] hyper::http::Error),
    /// The request body could not be serialized
    #[error("wallet status patch body could not be serialized")]
    Serialization(#[from] serde_json::Error),
}

impl WalletPatchError {
    /// HTTP status code of the rejection, absent when the failure happened below HTTP
    pub fn status_code(&self) -> Option<u16> {
        match self {
            WalletPatchError::ErrorResponse(code) => Some(*code),
            _ => None,
        }
    }
}

/// Boundary towards the wallet status endpoint
#[async_trait]
pub trait WalletsApi {
    /// Patches the wallet into the `ERROR` status with a human readable reason
    async fn update_wallet_status_error(
        &self,
        wallet_id: Uuid,
        reason: String,
    ) -> Result<(), WalletPatchError>;
}

/// [`WalletsApi`] implementation talking HTTP to the wallet service
pub struct HttpWalletsApi {
    client: Client<HttpConnector>,
    base_url: String,
    api_key: String,
}

impl HttpWalletsApi {
    /// Creates a new client for the given service location
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        }
    }
}

#[async_trait]
impl WalletsApi for HttpWalletsApi {
    async fn update_wallet_status_error(
        &self,
        wallet_id: Uuid,
        reason: String,
    ) -> Result<(), WalletPatchError> {
        let body = WalletStatusErrorPatchRequest {
            status: "ERROR",
            details: WalletStatusErrorPatchDetails { reason },
        };

        let request = Request::builder()
            .method(Method::PATCH)
            .uri(format!("{}/wallets/{}", self.base_url, wallet_id))
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .body(Body::from(serde_json::to_vec(&body)?))?;

        let response = self.client.request(request).await?;

        if !response.status().is_success() {
            return Err(WalletPatchError::ErrorResponse(response.status().as_u16()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod does {
    use super::*;

    #[test]
    fn serialize_patch_body() {
        let body = WalletStatusErrorPatchRequest {
            status: "ERROR",
            details: WalletStatusErrorPatchDetails {
                reason: "Wallet expired. Creation date: 2024-05-02T09:30:00Z".into(),
            },
        };

        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"status":"ERROR","details":{"reason":"Wallet expired. Creation date: 2024-05-02T09:30:00Z"}}"#
        );
    }

    #[test]
    fn expose_http_status_of_rejections() {
        assert_eq!(WalletPatchError::ErrorResponse(409).status_code(), Some(409));
    }
}
