//! HTTP adapter for [`RemoteGateway`] against the PropSync backend.

use crate::{error::GatewayError, gateway::RemoteGateway, session::Identity};
use async_trait::async_trait;
use propsync_core::{Property, PropertyId};
use serde::Deserialize;

/// Gateway implementation over the backend's REST API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    device_id: Option<String>,
}

/// Wire shape of `GET /api/properties`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullResponse {
    properties: Vec<Property>,
}

impl HttpGateway {
    /// Create a gateway against `base_url` (trailing slash tolerated).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            device_id: None,
        }
    }

    /// Tag requests with an `X-Device-Id` header.
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    fn properties_url(&self) -> String {
        format!("{}/api/properties", self.base_url)
    }

    fn property_url(&self, id: PropertyId) -> String {
        format!("{}/api/properties/{}", self.base_url, id)
    }

    fn decorate(&self, req: reqwest::RequestBuilder, identity: &Identity) -> reqwest::RequestBuilder {
        let req = match &identity.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        match &self.device_id {
            Some(device_id) => req.header("X-Device-Id", device_id),
            None => req,
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Status {
        code: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn push(&self, identity: &Identity, property: &Property) -> Result<(), GatewayError> {
        let req = self.client.post(self.properties_url()).json(property);
        let response = self.decorate(req, identity).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn pull_all(&self, identity: &Identity) -> Result<Vec<Property>, GatewayError> {
        let req = self.client.get(self.properties_url());
        let response = check_status(self.decorate(req, identity).send().await?).await?;
        let body: PullResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(body.properties)
    }

    async fn delete(&self, identity: &Identity, id: PropertyId) -> Result<(), GatewayError> {
        let req = self.client.delete(self.property_url(id));
        let response = self.decorate(req, identity).send().await?;
        // The server treats deleting an unknown id as a no-op success; a 404
        // from an older server version is equivalent for our purposes.
        if response.status().as_u16() == 404 {
            return Ok(());
        }
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let gateway = HttpGateway::new("https://api.propsync.example/");
        assert_eq!(
            gateway.properties_url(),
            "https://api.propsync.example/api/properties"
        );
    }

    #[test]
    fn property_url_includes_id() {
        let gateway = HttpGateway::new("https://api.propsync.example");
        let id = Uuid::new_v4();
        assert_eq!(
            gateway.property_url(id),
            format!("https://api.propsync.example/api/properties/{id}")
        );
    }
}
