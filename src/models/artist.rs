use serde::Serialize;

/// Artist as known to Yandex Music. Hashable so track lists can dedupe by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Artist {
    pub name: String,
    #[serde(rename = "yandex_music_id")]
    pub upstream_id: u64,
}

impl Artist {
    pub fn new(name: impl Into<String>, upstream_id: u64) -> Self {
        Artist {
            name: name.into(),
            upstream_id,
        }
    }
}
