pub const DEFAULT_API_BASE: &str = "https://api.music.yandex.net";

#[macro_export]
macro_rules! api_endpoint {
    ( $base: expr, $( $x: expr),+ ) => {{
        format!("{}{}", $base, format_args!($($x),+))
    }};
}

pub fn artist(artist_id: i64) -> String {
    format!("/artists/{artist_id}")
}

pub fn artist_brief_info(artist_id: i64) -> String {
    format!("/artists/{artist_id}/brief-info")
}

pub fn playlist(user_id: &str, playlist_id: &str) -> String {
    format!("/users/{user_id}/playlists/{playlist_id}")
}

pub fn album(album_id: &str) -> String {
    format!("/albums/{album_id}")
}
