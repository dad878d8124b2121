use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::models::artist::Artist;
use crate::models::price::Price;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concert {
    pub title: String,
    pub afisha_url: String,
    pub city: Option<String>,
    pub place: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "datetime")]
    pub occurs_at: Option<DateTime<FixedOffset>>,
    pub map_url: Option<String>,
    pub images: Vec<String>,
    pub min_price: Option<Price>,
    /// Never empty. Upstream concerts always carry exactly one artist.
    pub artists: Vec<Artist>,
}
