//! BrandKit domain core.
//!
//! Pure domain logic for template-driven asset generation: upload
//! validation, the content template registry, answer collection,
//! generation request building, the generation session state machine,
//! and the route-protection policy.
//!
//! This crate has no internal dependencies and performs no I/O of its
//! own. Storage and generation providers are consumed through the
//! traits in [`capability`].

pub mod answers;
pub mod capability;
pub mod error;
pub mod request;
pub mod routing;
pub mod session;
pub mod store;
pub mod template;
pub mod types;
pub mod upload;
