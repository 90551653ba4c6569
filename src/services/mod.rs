pub mod feed;
pub mod persistence;
pub mod settings;
