use regex::Regex;

/// Shape of a Yandex Music track list link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackListUrl {
    Playlist { user_id: String, playlist_id: String },
    Album { album_id: String },
    Unrecognized,
}

pub struct TrackListUrlClassifier {
    playlist: Regex,
    album: Regex,
}

impl TrackListUrlClassifier {
    pub fn new() -> Self {
        Self {
            playlist: Regex::new(r"^.*/users/(\S+)/playlists/(\S+)$").expect("bogus regexp"),
            album: Regex::new(r"^.*/album/(\S+)$").expect("bogus regexp"),
        }
    }

    /// Playlist shape wins over album shape when both would match.
    pub fn classify(&self, url: &str) -> TrackListUrl {
        if let Some(caps) = self.playlist.captures(url) {
            return TrackListUrl::Playlist {
                user_id: caps[1].to_string(),
                playlist_id: caps[2].to_string(),
            };
        }
        if let Some(caps) = self.album.captures(url) {
            return TrackListUrl::Album {
                album_id: caps[1].to_string(),
            };
        }
        TrackListUrl::Unrecognized
    }
}

impl Default for TrackListUrlClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_urls() {
        let classifier = TrackListUrlClassifier::new();
        assert_eq!(
            classifier.classify("https://music.yandex.ru/users/music-blog/playlists/2140"),
            TrackListUrl::Playlist {
                user_id: "music-blog".to_string(),
                playlist_id: "2140".to_string(),
            }
        );
        assert_eq!(
            classifier.classify("/users/u/playlists/p"),
            TrackListUrl::Playlist {
                user_id: "u".to_string(),
                playlist_id: "p".to_string(),
            }
        );
    }

    #[test]
    fn album_urls() {
        let classifier = TrackListUrlClassifier::new();
        assert_eq!(
            classifier.classify("https://music.yandex.ru/album/4766"),
            TrackListUrl::Album {
                album_id: "4766".to_string()
            }
        );
    }

    #[test]
    fn playlist_checked_before_album() {
        let classifier = TrackListUrlClassifier::new();
        assert_eq!(
            classifier.classify("https://music.yandex.ru/album/1/users/u/playlists/3"),
            TrackListUrl::Playlist {
                user_id: "u".to_string(),
                playlist_id: "3".to_string(),
            }
        );
    }

    #[test]
    fn everything_else_is_unrecognized() {
        let classifier = TrackListUrlClassifier::new();
        for url in [
            "",
            "https://music.yandex.ru/artist/41191",
            "https://music.yandex.ru/users/u/playlists/",
            "https://music.yandex.ru/album/",
            "https://music.yandex.ru/album/12 34",
            "https://music.yandex.ru/users/a b/playlists/1",
        ] {
            assert_eq!(classifier.classify(url), TrackListUrl::Unrecognized, "{url}");
        }
    }
}
