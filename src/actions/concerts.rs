use crate::endpoints;
use crate::error::ServiceError;
use crate::extract::{extract_concert, ExtractError};
use crate::models::concert::Concert;
use crate::service::{parse_failed, MusicService};

impl MusicService {
    /// All upcoming concerts of an artist. One malformed entry fails the whole batch.
    pub async fn resolve_concerts(&self, artist_id: i64) -> Result<Vec<Concert>, ServiceError> {
        log::info!(
            "Parsing concerts of artist {}. Fetching data from Yandex Music API ...",
            artist_id
        );
        let uri = endpoints::artist_brief_info(artist_id);
        let not_found_message = format!("Artist {artist_id} not found");
        let data = self.upstream.fetch_artist_data(&uri, &not_found_message).await?;
        log::info!("Fetched data from Yandex Music API for artist {}", artist_id);

        let concerts = data
            .get("concerts")
            .and_then(|concerts| concerts.as_array())
            .ok_or_else(|| ExtractError::MissingKey("concerts".to_string()))
            .and_then(|concerts| concerts.iter().map(extract_concert).collect::<Result<Vec<_>, _>>())
            .map_err(|err| parse_failed(format!("Parsing concerts of artist {artist_id} failed"), err))?;
        log::info!(
            "Parsing concerts of artist {} succeeded: {} found",
            artist_id,
            concerts.len()
        );
        Ok(concerts)
    }
}
