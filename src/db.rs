use std::{future::Future, sync::Arc, time::Duration};

use anyhow::{Context as _, Result, bail};
use reqwest::{Client, Url};
use tracing::trace;

use crate::{
    filter::SharedFilterResolver,
    influx::{Point, to_point_for},
    ruuvi::Measurement,
};

const TIMEOUT: Duration = Duration::from_secs(30);

/// Destination for converted points. Implementations own transport concerns;
/// a failed write is returned to the caller as is.
pub trait PointSink {
    fn write(&self, point: &Point) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone)]
pub struct InfluxDbSink {
    client: Client,
    url: Url,
    database: String,
    retention_policy: Option<String>,
    credentials: Option<(String, Option<String>)>,
}

impl InfluxDbSink {
    pub fn new(base_url: &str, database: impl Into<String>) -> Result<Self> {
        // Without a trailing slash `join` would replace the last path segment.
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let url = Url::parse(&base)
            .and_then(|u| u.join("write"))
            .with_context(|| format!("invalid InfluxDB URL: {base_url}"))?;

        let client = Client::builder()
            .connect_timeout(TIMEOUT)
            .timeout(TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            url,
            database: database.into(),
            retention_policy: None,
            credentials: None,
        })
    }

    pub fn with_retention_policy(mut self, retention_policy: impl Into<String>) -> Self {
        self.retention_policy = Some(retention_policy.into());
        self
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: Option<String>) -> Self {
        self.credentials = Some((user.into(), password));
        self
    }

    fn write_url(&self) -> Url {
        let mut url = self.url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("db", &self.database);
            if let Some(rp) = &self.retention_policy {
                query.append_pair("rp", rp);
            }
            query.append_pair("precision", "ms");
        }
        url
    }
}

impl PointSink for InfluxDbSink {
    async fn write(&self, point: &Point) -> Result<()> {
        let mut request = self
            .client
            .post(self.write_url())
            .body(point.to_line_protocol());

        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, password.as_ref());
        }

        let response = request
            .send()
            .await
            .context("failed to send InfluxDB write request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("InfluxDB write rejected: {status}: {}", body.trim());
        }

        Ok(())
    }
}

/// Filters, converts and writes measurements, one point per measurement.
#[derive(Debug)]
pub struct MeasurementWriter<S> {
    filters: Arc<SharedFilterResolver>,
    sink: S,
}

impl<S: PointSink> MeasurementWriter<S> {
    pub fn new(filters: Arc<SharedFilterResolver>, sink: S) -> Self {
        Self { filters, sink }
    }

    pub async fn save(&self, measurement: &Measurement) -> Result<()> {
        let point = to_point_for(measurement, &self.filters.snapshot());
        trace!(mac = %measurement.mac, fields = point.fields().len(), "writing point");

        self.sink
            .write(&point)
            .await
            .with_context(|| format!("failed to write measurement: {}", measurement.mac))
    }
}
