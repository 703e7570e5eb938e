use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use shared::{
    AttendancePeriod, AttendanceQuery, AttendanceRecord, DeleteAttendanceResponse,
    SaveAttendanceRequest, SaveAttendanceResponse,
};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::StoreError;
use crate::services::store::RecordStore;

/// API client for the attendance record store
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create an API client from the client configuration
    pub fn new(config: &ClientConfig) -> Result<Self, StoreError> {
        let client = ClientBuilder::new()
            .connect_timeout(config.request_timeout())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Create an API client with a custom base URL and default settings
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let config = ClientConfig {
            api_base_url: base_url.into(),
            ..ClientConfig::default()
        };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, StoreError> {
        if !response.status().is_success() {
            return Err(StoreError::from_response(response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl RecordStore for ApiClient {
    async fn list(&self, period: AttendancePeriod) -> Result<Vec<AttendanceRecord>, StoreError> {
        let url = self.build_url("api/attendance");
        debug!("GET {} for {}", url, period);

        let response = self
            .client
            .get(&url)
            .query(&AttendanceQuery::from(period))
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        response
            .json::<Vec<AttendanceRecord>>()
            .await
            .map_err(StoreError::Decode)
    }

    async fn save(
        &self,
        period: AttendancePeriod,
        records: &[AttendanceRecord],
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let url = self.build_url("api/attendance");
        debug!("POST {} with {} records for {}", url, records.len(), period);

        let request = SaveAttendanceRequest {
            month: period.month,
            year: period.year,
            attendance_data: records.to_vec(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let response = Self::handle_response_status(response).await?;
        let body = response
            .json::<SaveAttendanceResponse>()
            .await
            .map_err(StoreError::Decode)?;
        Ok(body.records)
    }

    async fn delete(&self, register_number: &str) -> Result<u32, StoreError> {
        let url = self.build_url(&format!(
            "api/attendance/{}",
            urlencoding::encode(register_number)
        ));
        debug!("DELETE {}", url);

        let response = self.client.delete(&url).send().await?;

        let response = Self::handle_response_status(response).await?;
        let body = response
            .json::<DeleteAttendanceResponse>()
            .await
            .map_err(StoreError::Decode)?;
        Ok(body.deleted_count)
    }
}
