use secrecy::SecretString;

/// Account credentials for the update endpoint.
///
/// No-IP only speaks HTTP Basic auth on `/nic/update`. Accounts with
/// two-factor authentication enabled must use a DDNS key (or another
/// application-specific password) here; there is no TOTP flow.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}
