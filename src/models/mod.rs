pub mod artist;
pub mod concert;
pub mod price;
pub mod track_list;
