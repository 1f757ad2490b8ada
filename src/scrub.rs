use std::sync::LazyLock;

use regex::Regex;

/// Placeholder tokens inserted where personally identifying text was found.
pub const MASKED_IP: &str = "<ip>";
pub const MASKED_NAME: &str = "<name>";
pub const MASKED_EMAIL: &str = "<email>";

/// Last known identity of the signed-in user, used only for masking.
/// Lookups are best-effort: a stale cached value is acceptable, a blocking
/// refresh is not.
#[derive(Debug, Clone, Default)]
pub struct UserIdentity {
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

pub trait UserIdentitySource: Send + Sync {
    fn cached_identity(&self) -> Option<UserIdentity>;
}

// Loose patterns: over-masking a version string that looks like an
// address is acceptable, a leaked address is not.
static IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,3}(\.\d{1,3}){3}\b").expect("hard-coded pattern"));
static IPV6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[0-9a-fA-F]{1,4}:){2,7}[0-9a-fA-F:]+\b").expect("hard-coded pattern")
});

/// Redacts personally identifying text from a message before it leaves
/// the device.
pub struct Scrubber {
    max_len: usize,
}

impl Scrubber {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn scrub(&self, message: &str, identity: Option<&UserIdentity>) -> String {
        let truncated: String = message.chars().take(self.max_len).collect();
        let masked = IPV4.replace_all(&truncated, MASKED_IP);
        let mut masked = IPV6.replace_all(&masked, MASKED_IP).into_owned();

        if let Some(identity) = identity {
            for (value, token) in [
                (&identity.email, MASKED_EMAIL),
                (&identity.display_name, MASKED_NAME),
                (&identity.username, MASKED_NAME),
            ] {
                if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                    masked = masked.replace(value, token);
                }
            }
        }
        masked
    }
}
