use crate::client::is_truthy;
use crate::endpoints;
use crate::error::ServiceError;
use crate::extract::{extract_album, extract_playlist};
use crate::models::track_list::TrackList;
use crate::service::{parse_failed, MusicService};
use crate::track_list_url::TrackListUrl;

impl MusicService {
    /// Resolves a playlist or album link into a [`TrackList`].
    pub async fn resolve_track_list(&self, url: &str) -> Result<TrackList, ServiceError> {
        log::info!("Parsing track list {} ...", url);
        match self.classifier.classify(url) {
            TrackListUrl::Playlist {
                user_id,
                playlist_id,
            } => self.resolve_playlist(url, &user_id, &playlist_id).await,
            TrackListUrl::Album { album_id } => self.resolve_album(url, &album_id).await,
            TrackListUrl::Unrecognized => {
                let message = format!("Track list {url} has incorrect URL");
                log::info!("{}", message);
                Err(ServiceError::NotFound(message))
            }
        }
    }

    async fn resolve_playlist(
        &self,
        url: &str,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<TrackList, ServiceError> {
        log::info!("Parsing playlist {}. Fetching data from Yandex Music API ...", url);
        let uri = endpoints::playlist(user_id, playlist_id);
        let not_found_message = format!("Playlist {url} not found");
        let data = self.upstream.fetch(&uri, &not_found_message).await?;
        log::info!("Fetched data from Yandex Music API for playlist {}", url);

        let playlist = extract_playlist(url, &data)
            .map_err(|err| parse_failed(format!("Parsing playlist {url} failed"), err))?;
        log::info!("Parsing playlist {} succeeded", url);
        Ok(playlist)
    }

    async fn resolve_album(&self, url: &str, album_id: &str) -> Result<TrackList, ServiceError> {
        log::info!("Parsing album {}. Fetching data from Yandex Music API ...", url);
        let uri = endpoints::album(album_id);
        let not_found_message = format!("Album {url} not found");
        let data = self.upstream.fetch(&uri, &not_found_message).await?;
        log::info!("Fetched data from Yandex Music API for album {}", url);

        // unknown albums come back as HTTP 200 with a top level error field
        if let Some(error) = data.get("error").filter(|error| is_truthy(error)) {
            log::info!("Album {} answered with error: {}", url, error);
            return Err(ServiceError::NotFound(not_found_message));
        }

        let album = extract_album(url, &data)
            .map_err(|err| parse_failed(format!("Parsing album {url} failed"), err))?;
        log::info!("Parsing album {} succeeded", url);
        Ok(album)
    }
}
