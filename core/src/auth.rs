use informes_common::config::Secret;

/// Compares the inbound `X-API-KEY` value against the configured secret.
pub struct Authenticator {
    secret: Secret,
}

impl Authenticator {
    pub fn new(secret: Secret) -> Self {
        Self { secret }
    }

    /// A missing header is never authorized, not even against an empty secret.
    pub fn is_authorized(&self, provided: Option<&str>) -> bool {
        provided.is_some_and(|key| self.secret.matches(key))
    }
}
