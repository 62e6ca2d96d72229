pub mod sessions;
pub mod templates;
pub mod upload;
