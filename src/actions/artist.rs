use crate::endpoints;
use crate::error::ServiceError;
use crate::extract::{extract_artist, ExtractError};
use crate::models::artist::Artist;
use crate::service::{parse_failed, MusicService};

impl MusicService {
    pub async fn resolve_artist(&self, artist_id: i64) -> Result<Artist, ServiceError> {
        log::info!("Parsing artist {}. Fetching data from Yandex Music API ...", artist_id);
        let uri = endpoints::artist(artist_id);
        let not_found_message = format!("Artist {artist_id} not found");
        let data = self.upstream.fetch_artist_data(&uri, &not_found_message).await?;
        log::info!("Fetched data from Yandex Music API for artist {}", artist_id);

        let artist = data
            .get("artist")
            .ok_or_else(|| ExtractError::MissingKey("artist".to_string()))
            .and_then(extract_artist)
            .map_err(|err| parse_failed(format!("Parsing info about artist {artist_id} failed"), err))?;
        log::info!("Parsing artist {} succeeded", artist_id);
        Ok(artist)
    }
}
