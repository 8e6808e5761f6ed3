use serde::{Deserialize, Serialize};

use crate::RpcError;

/// Shortest token the MCD console could have issued
const MIN_TOKEN_LEN: usize = 10;

/// Opaque MCP bearer token.
///
/// Never printed in full, see [`Credential::masked`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Validate user input and wrap it.
    pub fn new(raw: &str) -> Result<Self, RpcError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(RpcError::CredentialEmpty);
        }
        if token.chars().count() < MIN_TOKEN_LEN {
            return Err(RpcError::CredentialMalformed);
        }
        Ok(Self(token.to_owned()))
    }

    /// The raw token, only for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First and last four characters, e.g. `abcd****wxyz`.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let head: String = chars.iter().take(4).collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("{head}****{tail}")
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(matches!(Credential::new("   "), Err(RpcError::CredentialEmpty)));
        assert!(matches!(Credential::new("short"), Err(RpcError::CredentialMalformed)));

        let credential = Credential::new("  abcdefghijklmnop \n").unwrap();
        assert_eq!(credential.expose(), "abcdefghijklmnop");
    }

    #[test]
    fn test_never_printed() {
        let credential = Credential::new("abcdefghijklmnop").unwrap();
        assert_eq!(credential.masked(), "abcd****mnop");
        assert_eq!(format!("{credential:?}"), r#"Credential("abcd****mnop")"#);
    }

    #[test]
    fn test_serde_transparent() {
        let credential = Credential::new("abcdefghijklmnop").unwrap();
        assert_eq!(
            serde_json::to_string(&credential).unwrap(),
            r#""abcdefghijklmnop""#
        );
    }
}
