//! Pure conversions from upstream JSON fragments into models.
//!
//! Extractors either build a complete value or fail with [`ExtractError`];
//! the resolve actions turn that into an internal service error.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use thiserror::Error;

use crate::models::artist::Artist;
use crate::models::concert::Concert;
use crate::models::price::Price;
use crate::models::track_list::TrackList;

const CONCERT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";
const COVER_SIZE: &str = "400x400";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing key \"{0}\"")]
    MissingKey(String),
    #[error("key \"{key}\" is not {expected}")]
    WrongType { key: String, expected: &'static str },
    #[error("key \"{0}\" is empty")]
    Empty(String),
    #[error("unparsable datetime \"{0}\"")]
    InvalidDatetime(String),
}

fn wrong_type(key: &str, expected: &'static str) -> ExtractError {
    ExtractError::WrongType {
        key: key.to_string(),
        expected,
    }
}

/// Null counts as missing, like an absent key.
fn required<'a>(fragment: &'a Value, key: &str) -> Result<&'a Value, ExtractError> {
    match fragment.get(key) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(ExtractError::MissingKey(key.to_string())),
    }
}

fn optional<'a>(fragment: &'a Value, key: &str) -> Option<&'a Value> {
    fragment.get(key).filter(|value| !value.is_null())
}

fn required_str(fragment: &Value, key: &str) -> Result<String, ExtractError> {
    let value = required(fragment, key)?
        .as_str()
        .ok_or_else(|| wrong_type(key, "a string"))?;
    if value.is_empty() {
        return Err(ExtractError::Empty(key.to_string()));
    }
    Ok(value.to_string())
}

fn optional_str(fragment: &Value, key: &str) -> Result<Option<String>, ExtractError> {
    optional(fragment, key)
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| wrong_type(key, "a string"))
        })
        .transpose()
}

fn required_array<'a>(fragment: &'a Value, key: &str) -> Result<&'a Vec<Value>, ExtractError> {
    required(fragment, key)?
        .as_array()
        .ok_or_else(|| wrong_type(key, "an array"))
}

pub fn extract_artist(fragment: &Value) -> Result<Artist, ExtractError> {
    let name = required_str(fragment, "name")?;
    let upstream_id = required(fragment, "id")?;
    // ids come back as numbers from most endpoints but as strings from a few
    let upstream_id = match upstream_id {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| wrong_type("id", "a non-negative integer"))?;
    Ok(Artist::new(name, upstream_id))
}

fn extract_price(fragment: &Value) -> Result<Price, ExtractError> {
    let value = required(fragment, "value")?;
    let amount = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| wrong_type("value", "a non-negative number"))?;
    Ok(Price::new(amount, required_str(fragment, "currency")?))
}

fn extract_datetime(fragment: &Value) -> Result<Option<DateTime<FixedOffset>>, ExtractError> {
    match optional_str(fragment, "datetime")? {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => DateTime::parse_from_str(&raw, CONCERT_DATETIME_FORMAT)
            .map(Some)
            .map_err(|_| ExtractError::InvalidDatetime(raw)),
    }
}

pub fn extract_concert(fragment: &Value) -> Result<Concert, ExtractError> {
    let images = match optional(fragment, "images") {
        None => Vec::new(),
        Some(images) => images
            .as_array()
            .ok_or_else(|| wrong_type("images", "an array"))?
            .iter()
            .map(|image| {
                image
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| wrong_type("images", "an array of strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
    };
    let min_price = optional(fragment, "minPrice")
        .map(extract_price)
        .transpose()?;

    Ok(Concert {
        title: required_str(fragment, "concertTitle")?,
        afisha_url: required_str(fragment, "afishaUrl")?,
        city: optional_str(fragment, "city")?,
        place: optional_str(fragment, "place")?,
        address: optional_str(fragment, "address")?,
        occurs_at: extract_datetime(fragment)?,
        map_url: optional_str(fragment, "mapUrl")?,
        images,
        min_price,
        artists: vec![extract_artist(required(fragment, "artist")?)?],
    })
}

/// Collects artists once each, keeping the order they were first seen in.
fn dedup_artists<'a>(
    fragments: impl IntoIterator<Item = &'a Value>,
) -> Result<Vec<Artist>, ExtractError> {
    let mut seen = HashSet::new();
    let mut artists = Vec::new();
    for fragment in fragments {
        let artist = extract_artist(fragment)?;
        if seen.insert(artist.clone()) {
            artists.push(artist);
        }
    }
    Ok(artists)
}

pub fn extract_playlist(url: &str, fragment: &Value) -> Result<TrackList, ExtractError> {
    let mut artist_fragments = Vec::new();
    for short_track in required_array(fragment, "tracks")? {
        let track = required(short_track, "track")?;
        artist_fragments.extend(required_array(track, "artists")?);
    }
    track_list(url, fragment, dedup_artists(artist_fragments)?)
}

pub fn extract_album(url: &str, fragment: &Value) -> Result<TrackList, ExtractError> {
    let artists = dedup_artists(required_array(fragment, "artists")?)?;
    track_list(url, fragment, artists)
}

fn track_list(url: &str, fragment: &Value, artists: Vec<Artist>) -> Result<TrackList, ExtractError> {
    if url.is_empty() {
        return Err(ExtractError::Empty("url".to_string()));
    }
    let cover = optional_str(fragment, "ogImage")?;
    Ok(TrackList {
        url: url.to_string(),
        title: required_str(fragment, "title")?,
        cover_image: cover_link(cover.as_deref()),
        artists,
    })
}

/// Turns a cover locator such as `avatars.yandex.net/get-music-content/1/a.a.2-1/%%`
/// into a 400x400 https link by replacing its trailing `%%` placeholder.
pub fn cover_link(raw_uri: Option<&str>) -> Option<String> {
    raw_uri.map(|raw| {
        let mut chars = raw.chars();
        chars.next_back();
        chars.next_back();
        format!("https://{}{}", chars.as_str(), COVER_SIZE)
    })
}
