use super::dto::FederatedProfile;
use crate::users::User;

/// Size hint Google appends to avatar URLs.
pub const AVATAR_SIZE_SUFFIX: &str = "?sz=50";

/// Drop the avatar size hint; exact substring removal, not query parsing.
pub fn strip_avatar_size(url: &str) -> String {
    url.replace(AVATAR_SIZE_SUFFIX, "")
}

/// Overwrite the provider-owned fields of `user` with the profile's values.
/// Id and email are left as they are.
pub fn merge_profile(mut user: User, profile: &FederatedProfile) -> User {
    user.min_age = profile.age_min;
    user.max_age = profile.age_max;
    user.photo = strip_avatar_size(&profile.avatar_url);
    user.full_name = profile.display_name.clone();
    user
}
