use std::time::Duration;

use moka::future::Cache;

use crate::config::GatewayConfig;
use crate::models::concert::Concert;
use crate::models::track_list::TrackList;

/// Time-bound memo of successful responses. Errors are never cached.
pub struct ResponseCache {
    concerts: Option<Cache<i64, Vec<Concert>>>,
    track_lists: Option<Cache<String, TrackList>>,
}

fn build<K, V>(capacity: u64, ttl: Duration) -> Option<Cache<K, V>>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    if ttl.is_zero() {
        return None;
    }
    Some(
        Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build(),
    )
}

impl ResponseCache {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            concerts: build(config.cache_capacity, config.concerts_cache_ttl()),
            track_lists: build(config.cache_capacity, config.track_list_cache_ttl()),
        }
    }

    pub async fn concerts(&self, artist_id: i64) -> Option<Vec<Concert>> {
        self.concerts.as_ref()?.get(&artist_id).await
    }

    pub async fn store_concerts(&self, artist_id: i64, concerts: Vec<Concert>) {
        if let Some(cache) = &self.concerts {
            cache.insert(artist_id, concerts).await;
        }
    }

    pub async fn track_list(&self, url: &str) -> Option<TrackList> {
        self.track_lists.as_ref()?.get(url).await
    }

    pub async fn store_track_list(&self, url: &str, track_list: TrackList) {
        if let Some(cache) = &self.track_lists {
            cache.insert(url.to_string(), track_list).await;
        }
    }
}
