use bcrypt::{BcryptError, DEFAULT_COST};
use tracing::warn;

/// bcrypt, salt and cost are carried inside the stored hash
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, DEFAULT_COST)
}

/// A stored value that isn't a bcrypt hash never matches
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or_else(|err| {
        warn!("Unusable password hash: {err}");
        false
    })
}
