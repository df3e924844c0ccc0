//! Accounts: the current user's standing as a licensor in some directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ownership of a licensor identity at one licensing API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub api: String,
    #[serde(rename = "licensorID")]
    pub licensor_id: Uuid,
    pub token: String,
}

impl Account {
    /// Whether this account owns offers published by `licensor_id` at `api`.
    pub fn owns(&self, api: &str, licensor_id: &Uuid) -> bool {
        self.api == api && &self.licensor_id == licensor_id
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("api", &self.api)
            .field("licensor_id", &self.licensor_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_token() {
        let account: Account = serde_json::from_str(
            r#"{"api":"https://api.example.com","licensorID":"22222222-2222-4222-8222-222222222222","token":"s3cret"}"#,
        )
        .unwrap();
        let debug = format!("{:?}", account);
        assert!(!debug.contains("s3cret"));
        assert!(account.owns(
            "https://api.example.com",
            &Uuid::parse_str("22222222-2222-4222-8222-222222222222").unwrap()
        ));
    }
}
