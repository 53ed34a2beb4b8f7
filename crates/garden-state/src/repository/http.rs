//! HTTP Repository
//!
//! `GardenRepository` over the REST backend with reqwest. In the browser
//! every request carries the session cookie (`credentials: include`).

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{RemoteError, RemoteResult};
use crate::raw::{RawGarden, RawGardenLog, RawNotification, RawPlant};

use super::payloads::{GardenUpdate, NewGarden, NewGardenLog, NewNotification};
use super::traits::GardenRepository;

const GARDENS: &str = "/gardens/gardens/";
const GARDEN_LOGS: &str = "/gardens/garden-logs/";
const NOTIFICATIONS: &str = "/notifications/notifications/";
const INSTANCES: &str = "/notifications/instances/";
const PLANTS: &str = "/plants/plants/";

#[derive(Debug, Clone)]
pub struct HttpGardenRepository {
    client: Client,
    base_url: String,
}

impl HttpGardenRepository {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_credentials_include();
        builder
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> RemoteResult<Response> {
        let response = builder.send().await.map_err(|e| RemoteError::Network {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            log::error!("[HttpGardenRepository] {} answered {}", path, status);
            return Err(RemoteError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> RemoteResult<T> {
        response.json::<T>().await.map_err(|e| RemoteError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        Self::decode(response, path).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> RemoteResult<T> {
        let response = self.send(self.request(method, path).json(body), path).await?;
        Self::decode(response, path).await
    }

    async fn delete(&self, path: &str) -> RemoteResult<()> {
        self.send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }

    /// POST without a body; an empty or id-less answer yields `None`
    async fn post_action(&self, path: &str) -> RemoteResult<Option<RawNotification>> {
        let response = self.send(self.request(Method::POST, path), path).await?;
        let text = response.text().await.map_err(|e| RemoteError::Network {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let raw: RawNotification = serde_json::from_str(&text).map_err(|e| RemoteError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(raw.id.map(|_| raw))
    }
}

#[async_trait(?Send)]
impl GardenRepository for HttpGardenRepository {
    async fn list_gardens(&self) -> RemoteResult<Vec<RawGarden>> {
        self.get_json(GARDENS).await
    }

    async fn list_notifications(&self) -> RemoteResult<Vec<RawNotification>> {
        self.get_json(NOTIFICATIONS).await
    }

    async fn list_plants(&self) -> RemoteResult<Vec<RawPlant>> {
        self.get_json(PLANTS).await
    }

    async fn create_garden(&self, garden: &NewGarden) -> RemoteResult<RawGarden> {
        self.send_json(Method::POST, GARDENS, garden).await
    }

    async fn update_garden(&self, id: u32, update: &GardenUpdate) -> RemoteResult<RawGarden> {
        self.send_json(Method::PATCH, &format!("{GARDENS}{id}/"), update).await
    }

    async fn delete_garden(&self, id: u32) -> RemoteResult<()> {
        self.delete(&format!("{GARDENS}{id}/")).await
    }

    async fn create_garden_log(&self, log: &NewGardenLog) -> RemoteResult<RawGardenLog> {
        self.send_json(Method::POST, GARDEN_LOGS, log).await
    }

    async fn delete_garden_log(&self, id: u32) -> RemoteResult<()> {
        self.delete(&format!("{GARDEN_LOGS}{id}/")).await
    }

    async fn create_notification(&self, notification: &NewNotification) -> RemoteResult<RawNotification> {
        self.send_json(Method::POST, NOTIFICATIONS, notification).await
    }

    async fn delete_notification(&self, id: u32) -> RemoteResult<()> {
        self.delete(&format!("{NOTIFICATIONS}{id}/")).await
    }

    async fn complete_instance(&self, instance_id: u32) -> RemoteResult<Option<RawNotification>> {
        self.post_action(&format!("{INSTANCES}{instance_id}/complete/")).await
    }

    async fn skip_instance(&self, instance_id: u32) -> RemoteResult<Option<RawNotification>> {
        self.post_action(&format!("{INSTANCES}{instance_id}/skip/")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let repo = HttpGardenRepository::new("http://localhost:8000/api/");
        assert_eq!(repo.base_url(), "http://localhost:8000/api");
        assert_eq!(repo.url(GARDENS), "http://localhost:8000/api/gardens/gardens/");
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            api_base: "https://garden.example".into(),
            ..Default::default()
        };
        let repo = HttpGardenRepository::from_config(&config);
        assert_eq!(repo.url(&format!("{INSTANCES}3/skip/")), "https://garden.example/notifications/instances/3/skip/");
    }
}
