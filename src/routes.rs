use std::sync::Arc;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, routes, Build, Rocket, State};
use serde::{Serialize, Serializer};

use crate::cache::ResponseCache;
use crate::error::ServiceError;
use crate::models::artist::Artist;
use crate::models::concert::Concert;
use crate::models::track_list::TrackList;
use crate::service::MusicService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success = 0,
    InternalError = 1,
    ArtistNotFound = 2,
    TrackListNotFound = 3,
}

impl ResponseCode {
    fn name(self) -> &'static str {
        match self {
            ResponseCode::Success => "SUCCESS",
            ResponseCode::InternalError => "INTERNAL_ERROR",
            ResponseCode::ArtistNotFound => "ARTIST_NOT_FOUND",
            ResponseCode::TrackListNotFound => "TRACK_LIST_NOT_FOUND",
        }
    }
}

impl Serialize for ResponseCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseStatus {
    pub code: ResponseCode,
    pub message: String,
}

impl ResponseStatus {
    fn success() -> Self {
        ResponseStatus {
            code: ResponseCode::Success,
            message: ResponseCode::Success.name().to_string(),
        }
    }

    /// HTTP status and body status for a failed resolve.
    fn failure(err: ServiceError, not_found: ResponseCode) -> (Status, Self) {
        match err {
            ServiceError::NotFound(message) => (
                Status::NotFound,
                ResponseStatus {
                    code: not_found,
                    message,
                },
            ),
            ServiceError::Internal(message) => (
                Status::InternalServerError,
                ResponseStatus {
                    code: ResponseCode::InternalError,
                    message,
                },
            ),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConcertsResponse {
    pub status: ResponseStatus,
    pub concerts: Option<Vec<Concert>>,
}

#[derive(Debug, Serialize)]
pub struct TrackListResponse {
    pub status: ResponseStatus,
    pub track_list: Option<TrackList>,
}

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub status: ResponseStatus,
    pub artist: Option<Artist>,
}

#[get("/concerts?<artist_id>")]
pub async fn concerts(
    artist_id: i64,
    service: &State<Arc<MusicService>>,
    cache: &State<ResponseCache>,
) -> (Status, Json<ConcertsResponse>) {
    if let Some(concerts) = cache.concerts(artist_id).await {
        log::debug!("Serving concerts of artist {} from cache", artist_id);
        return ok_concerts(concerts);
    }
    match service.resolve_concerts(artist_id).await {
        Ok(concerts) => {
            cache.store_concerts(artist_id, concerts.clone()).await;
            ok_concerts(concerts)
        }
        Err(err) => {
            let (http_status, status) = ResponseStatus::failure(err, ResponseCode::ArtistNotFound);
            (
                http_status,
                Json(ConcertsResponse {
                    status,
                    concerts: None,
                }),
            )
        }
    }
}

fn ok_concerts(concerts: Vec<Concert>) -> (Status, Json<ConcertsResponse>) {
    (
        Status::Ok,
        Json(ConcertsResponse {
            status: ResponseStatus::success(),
            concerts: Some(concerts),
        }),
    )
}

#[get("/tracks-lists?<url>")]
pub async fn track_list(
    url: String,
    service: &State<Arc<MusicService>>,
    cache: &State<ResponseCache>,
) -> (Status, Json<TrackListResponse>) {
    if let Some(track_list) = cache.track_list(&url).await {
        log::debug!("Serving track list {} from cache", url);
        return ok_track_list(track_list);
    }
    match service.resolve_track_list(&url).await {
        Ok(track_list) => {
            cache.store_track_list(&url, track_list.clone()).await;
            ok_track_list(track_list)
        }
        Err(err) => {
            let (http_status, status) =
                ResponseStatus::failure(err, ResponseCode::TrackListNotFound);
            (
                http_status,
                Json(TrackListResponse {
                    status,
                    track_list: None,
                }),
            )
        }
    }
}

fn ok_track_list(track_list: TrackList) -> (Status, Json<TrackListResponse>) {
    (
        Status::Ok,
        Json(TrackListResponse {
            status: ResponseStatus::success(),
            track_list: Some(track_list),
        }),
    )
}

#[get("/artists?<artist_id>")]
pub async fn artist(
    artist_id: i64,
    service: &State<Arc<MusicService>>,
) -> (Status, Json<ArtistResponse>) {
    match service.resolve_artist(artist_id).await {
        Ok(artist) => (
            Status::Ok,
            Json(ArtistResponse {
                status: ResponseStatus::success(),
                artist: Some(artist),
            }),
        ),
        Err(err) => {
            let (http_status, status) = ResponseStatus::failure(err, ResponseCode::ArtistNotFound);
            (
                http_status,
                Json(ArtistResponse {
                    status,
                    artist: None,
                }),
            )
        }
    }
}

pub fn mount(
    rocket: Rocket<Build>,
    service: Arc<MusicService>,
    cache: ResponseCache,
) -> Rocket<Build> {
    rocket
        .manage(service)
        .manage(cache)
        .mount("/", routes![concerts, track_list, artist])
}
