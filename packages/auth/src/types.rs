use chrono::{DateTime, Utc};

/// A login session backing one bearer token
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Result of creating a session: the plaintext token is returned exactly once
#[derive(Debug)]
pub struct SessionGeneration {
    pub token: String,
    pub session: Session,
}

impl SessionGeneration {
    pub fn new(token: String, session: Session) -> Self {
        Self { token, session }
    }
}
