use std::{future::Future, time::Duration};

use log::{debug, info};
use reqwest::Client;

use super::{error::ScheduleError, models::Config};

/// A trait, necessary for every entity that will be used for getting raw answers of the timetable API.
/// `query` is everything after `?` in the timetable_export.cgi URL.
pub trait ScheduleGetter: Send + Sync + 'static {
    fn fetch(&self, query: String) -> impl Future<Output = Result<String, ScheduleError>> + Send;
}

/// Talks to the real timetable_export.cgi over HTTP.
#[derive(Debug, Clone)]
pub struct RozkladClient {
    http_client: Client,
    base_url: String,
}

impl RozkladClient {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ScheduleError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        info!("Using timetable API at {}", config.upstream_url);
        Ok(Self::new(http_client, config.upstream_url.as_str()))
    }

    pub fn url_for(&self, query: &str) -> String {
        format!("{}?{}", self.base_url, query)
    }
}

impl ScheduleGetter for RozkladClient {
    fn fetch(&self, query: String) -> impl Future<Output = Result<String, ScheduleError>> + Send {
        let request_url = self.url_for(&query);
        let request = self.http_client.get(request_url.as_str());
        async move {
            debug!("GET {}", request_url);
            let response = request.send().await?.error_for_status()?;
            let body = response.text().await?;
            Ok::<_, ScheduleError>(body)
        }
    }
}
