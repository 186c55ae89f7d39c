use serde::Deserialize;

/// Profile payload as returned by the Google people endpoint.
///
/// Fields the user did not consent to share are absent from the payload,
/// so every field defaults; only wrong shapes fail to parse.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GooglePerson {
    pub id: String,
    pub display_name: String,
    pub emails: Vec<GoogleEmail>,
    pub image: GoogleImage,
    pub age_range: GoogleAgeRange,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GoogleEmail {
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GoogleImage {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GoogleAgeRange {
    pub min: i32,
    pub max: i32,
}

/// Provider profile, valid for a single login request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FederatedProfile {
    pub external_id: String,
    pub display_name: String,
    pub emails: Vec<String>,
    pub avatar_url: String,
    pub age_min: i32,
    pub age_max: i32,
}

impl FederatedProfile {
    /// The first listed email is the authoritative one.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails
            .first()
            .map(String::as_str)
            .filter(|email| !email.trim().is_empty())
    }
}

impl From<GooglePerson> for FederatedProfile {
    fn from(p: GooglePerson) -> Self {
        Self {
            external_id: p.id,
            display_name: p.display_name,
            emails: p.emails.into_iter().map(|e| e.value).collect(),
            avatar_url: p.image.url,
            age_min: p.age_range.min,
            age_max: p.age_range.max,
        }
    }
}
