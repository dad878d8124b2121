use serde::Serialize;

use crate::models::artist::Artist;

/// Playlist or album, flattened to a title, a cover and the artists it features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackList {
    pub url: String,
    pub title: String,
    #[serde(rename = "image")]
    pub cover_image: Option<String>,
    pub artists: Vec<Artist>,
}
