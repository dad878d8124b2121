use crate::client::{HttpTransport, Transport, TransportError, UpstreamClient};
use crate::config::GatewayConfig;
use crate::error::ServiceError;
use crate::extract::ExtractError;
use crate::track_list_url::TrackListUrlClassifier;

/// Resolves Yandex Music data through one long-lived upstream session.
///
/// The session exists from [`setup`](Self::setup) until
/// [`terminate`](Self::terminate), which consumes the service.
pub struct MusicService {
    pub(crate) upstream: UpstreamClient,
    pub(crate) classifier: TrackListUrlClassifier,
}

impl MusicService {
    pub fn setup(config: &GatewayConfig) -> Result<Self, TransportError> {
        log::info!(
            "Setting up HTTP session with Yandex Music API at {} ...",
            config.upstream_base_url
        );
        let transport = HttpTransport::new(config.upstream_base_url.as_str(), config.request_timeout())?;
        log::info!("HTTP session with Yandex Music API established");
        Ok(Self::with_transport(transport))
    }

    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            upstream: UpstreamClient::new(transport),
            classifier: TrackListUrlClassifier::new(),
        }
    }

    pub fn terminate(self) {
        log::warn!("Terminating HTTP session with Yandex Music API ...");
        drop(self.upstream);
        log::warn!("HTTP session with Yandex Music API terminated");
    }
}

/// Logs an extraction failure and hides it behind a generic internal error.
pub(crate) fn parse_failed(message: String, err: ExtractError) -> ServiceError {
    log::warn!("{}: {}", message, err);
    ServiceError::Internal(message)
}
