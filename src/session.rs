use std::path::PathBuf;

use crate::settings::config_dir;

// ============================================================================
// SESSION — persisted access token + account identifier
// ============================================================================

/// The two values the client persists between launches: the access token and
/// the account identifier. The identifier is stored as text and parsed back
/// to a number on load; an unparsable value reads as no session.
///
/// Written by login, read by every authenticated request, removed together
/// on logout.
pub struct Session {
    path: Option<PathBuf>,
    token: Option<String>,
    account_id: Option<u64>,
}

impl Session {
    /// Load the session from the platform config directory.
    pub fn load_default() -> Self {
        match config_dir() {
            Some(dir) => Self::load_from(dir.join("doctrine_session.cfg")),
            None => Self {
                path: None,
                token: None,
                account_id: None,
            },
        }
    }

    /// Load the session from an explicit file path.
    pub fn load_from(path: PathBuf) -> Self {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        let mut session = Self {
            path: Some(path),
            token: None,
            account_id: None,
        };

        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else { continue };
            match key.trim() {
                "access_token" => session.token = Some(value.trim().to_string()),
                "account_id" => session.account_id = value.trim().parse().ok(),
                _ => {}
            }
        }
        session
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn account_id(&self) -> Option<u64> {
        self.account_id
    }

    /// A session is usable only when both values are present.
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some() && self.account_id.is_some()
    }

    /// Record a fresh login and persist it.
    pub fn store(&mut self, token: String, account_id: u64) {
        self.token = Some(token);
        self.account_id = Some(account_id);
        self.save();
    }

    /// Forget the session and remove the file (logout, or a rejected token).
    pub fn clear(&mut self) {
        self.token = None;
        self.account_id = None;
        if let Some(path) = &self.path {
            let _ = std::fs::remove_file(path);
        }
    }

    fn save(&self) {
        let Some(path) = &self.path else { return };
        let (Some(token), Some(account_id)) = (&self.token, self.account_id) else { return };
        let content = format!("access_token={token}\naccount_id={account_id}\n");
        let _ = std::fs::write(path, content);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_session_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "doctrine_session_test_{}_{tag}.cfg",
            std::process::id()
        ))
    }

    #[test]
    fn missing_file_means_logged_out() {
        let session = Session::load_from(temp_session_path("missing"));
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
        assert_eq!(session.account_id(), None);
    }

    #[test]
    fn store_round_trips_through_the_file() {
        let path = temp_session_path("roundtrip");
        let mut session = Session::load_from(path.clone());
        session.store("T".to_string(), 42);

        let reloaded = Session::load_from(path.clone());
        assert!(reloaded.is_logged_in());
        assert_eq!(reloaded.token(), Some("T"));
        assert_eq!(reloaded.account_id(), Some(42));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn clear_removes_the_file() {
        let path = temp_session_path("clear");
        let mut session = Session::load_from(path.clone());
        session.store("T".to_string(), 7);
        assert!(path.exists());

        session.clear();
        assert!(!session.is_logged_in());
        assert!(!path.exists());
    }

    #[test]
    fn unparsable_account_id_reads_as_logged_out() {
        let path = temp_session_path("garbage");
        std::fs::write(&path, "access_token=T\naccount_id=not-a-number\n").unwrap();

        let session = Session::load_from(path.clone());
        assert_eq!(session.token(), Some("T"));
        assert_eq!(session.account_id(), None);
        assert!(!session.is_logged_in());

        let _ = std::fs::remove_file(path);
    }
}
