use std::fmt;

use cookie::Cookie;

use crate::error::MetaError;

pub const DLE_USER_ID: &str = "dle_user_id";
pub const DLE_PASSWORD: &str = "dle_password";
pub const PHPSESSID: &str = "PHPSESSID";

/// The three session cookies ranobes.com requires on every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    dle_user_id: String,
    dle_password: String,
    phpsessid: String,
}

impl Credentials {
    /// Partial credentials are treated as no credentials: every value must be
    /// present and non-blank.
    pub fn from_parts(
        dle_user_id: Option<&str>,
        dle_password: Option<&str>,
        phpsessid: Option<&str>,
    ) -> Result<Self, MetaError> {
        let (Some(dle_user_id), Some(dle_password), Some(phpsessid)) = (
            non_blank(dle_user_id),
            non_blank(dle_password),
            non_blank(phpsessid),
        ) else {
            return Err(MetaError::Unauthenticated);
        };
        Ok(Self {
            dle_user_id,
            dle_password,
            phpsessid,
        })
    }

    /// Value for a `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        [
            (DLE_USER_ID, &self.dle_user_id),
            (DLE_PASSWORD, &self.dle_password),
            (PHPSESSID, &self.phpsessid),
        ]
        .into_iter()
        .map(|(name, value)| Cookie::new(name, value.as_str()).to_string())
        .collect::<Vec<_>>()
        .join("; ")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field(DLE_USER_ID, &self.dle_user_id)
            .field(DLE_PASSWORD, &"<redacted>")
            .field(PHPSESSID, &"<redacted>")
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_parts_required() {
        assert!(Credentials::from_parts(Some("1"), Some("hash"), Some("sess")).is_ok());
        assert!(matches!(
            Credentials::from_parts(Some("1"), None, Some("sess")),
            Err(MetaError::Unauthenticated)
        ));
        assert!(matches!(
            Credentials::from_parts(Some("1"), Some("hash"), Some("  ")),
            Err(MetaError::Unauthenticated)
        ));
        assert!(matches!(
            Credentials::from_parts(None, None, None),
            Err(MetaError::Unauthenticated)
        ));
    }

    #[test]
    fn test_cookie_header() {
        let creds = Credentials::from_parts(Some("42"), Some("abc"), Some(" s1 ")).unwrap();
        assert_eq!(
            creds.cookie_header(),
            "dle_user_id=42; dle_password=abc; PHPSESSID=s1"
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials::from_parts(Some("42"), Some("secret"), Some("session")).unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("session"));
    }
}
