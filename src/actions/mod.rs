pub mod artist;
pub mod concerts;
pub mod track_list;
