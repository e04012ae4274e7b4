use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, instrument};

use crate::config::TrackerConfig;
use crate::error::ApiError;
use crate::export::CSV_FILE_NAME;
use crate::model::Player;

/// A serialized log ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    pub match_id: u32,
    pub csv: String,
    /// Number of log entries the CSV covers, counted from the start of the log.
    pub count: usize,
}

/// The remote roster and ingestion services.
#[async_trait]
pub trait TrackerBackend: Send + Sync {
    /// Fetch every player the roster service knows about.
    async fn fetch_players(&self) -> Result<Vec<Player>, ApiError>;

    /// Submit one batch. Any 2xx response counts as success.
    async fn upload_events(&self, batch: &UploadBatch) -> Result<(), ApiError>;
}

/// HTTP implementation of [`TrackerBackend`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> Result<(), rugby_event_tracker::ApiError> {
/// use rugby_event_tracker::{TrackerBackend, TrackerClient, TrackerConfig};
///
/// let client = TrackerClient::new(TrackerConfig::default());
/// let players = client.fetch_players().await?;
/// println!("Found {} players", players.len());
/// # Ok(())
/// # }
/// ```
pub struct TrackerClient {
    http: reqwest::Client,
    config: TrackerConfig,
}

impl TrackerClient {
    /// Create a new client with default HTTP settings.
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client, config: TrackerConfig) -> Self {
        Self {
            http: client,
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

#[async_trait]
impl TrackerBackend for TrackerClient {
    #[instrument(skip(self))]
    async fn fetch_players(&self) -> Result<Vec<Player>, ApiError> {
        let url = self.config.roster_url();
        debug!(url, "fetching roster");

        let mut request = self.http.get(&url);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| ApiError::Http {
            url: url.clone(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus { url, status });
        }

        let players: Vec<Player> = response
            .json()
            .await
            .map_err(|e| ApiError::ResponseBody {
                url: url.clone(),
                source: e,
            })?;
        debug!(count = players.len(), "parsed roster");
        Ok(players)
    }

    #[instrument(skip(self, batch), fields(match_id = batch.match_id, count = batch.count))]
    async fn upload_events(&self, batch: &UploadBatch) -> Result<(), ApiError> {
        let url = self.config.upload_url();

        let file = Part::text(batch.csv.clone())
            .file_name(CSV_FILE_NAME)
            .mime_str("text/csv")
            .map_err(ApiError::InvalidPart)?;
        let form = Form::new()
            .part("file", file)
            .text("match_id", batch.match_id.to_string());

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus { url, status });
        }
        info!(%status, "events uploaded");
        Ok(())
    }
}
