pub mod client;
pub mod dto;
pub mod merge;

pub use client::{GoogleClient, IdentityProvider, ProviderError};
pub use dto::FederatedProfile;
pub use merge::{merge_profile, strip_avatar_size};
