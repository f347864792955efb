pub mod detail;
pub mod grid;
pub mod home;
pub mod player;
pub mod search;
pub mod watchlist;
