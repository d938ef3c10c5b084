use crate::error::{PluginError, Result};

/// Every GPTProto API key starts with this prefix.
pub const SECRET_KEY_PREFIX: &str = "sk-";

/// Surface-format check only; whether the key is actually accepted by the
/// remote service is discovered on first use. Runs before any network call.
pub fn validate(api_key: &str) -> Result<()> {
    if api_key.is_empty() || !api_key.starts_with(SECRET_KEY_PREFIX) {
        return Err(PluginError::InvalidCredentialFormat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_prefixed_key() {
        assert!(validate("sk-83a0c6d0768b4909b7c37851159a48fb").is_ok());
    }

    #[test]
    fn rejects_empty_key() {
        assert!(matches!(
            validate(""),
            Err(PluginError::InvalidCredentialFormat)
        ));
    }

    #[test]
    fn rejects_unprefixed_key() {
        assert!(matches!(
            validate("api-83a0c6d0768b4909"),
            Err(PluginError::InvalidCredentialFormat)
        ));
        // Prefix check is exact, not case-insensitive.
        assert!(validate("SK-83a0c6d0768b4909").is_err());
    }
}
