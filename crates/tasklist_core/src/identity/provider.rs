//! Identity provider contract and credential validation.

use crate::db::DbError;
use crate::model::session::{Identity, SessionChanged};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::Sender;

pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub type AuthResult<T> = Result<T, AuthError>;

/// Identity provider failures. Display text is shown to the user verbatim.
#[derive(Debug)]
pub enum AuthError {
    InvalidEmail(String),
    WeakPassword,
    EmailInUse(String),
    InvalidCredentials,
    Db(DbError),
    InvalidData(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(email) => write!(f, "The email address `{email}` is badly formatted."),
            Self::WeakPassword => write!(
                f,
                "Password should be at least {MIN_PASSWORD_CHARS} characters."
            ),
            Self::EmailInUse(email) => {
                write!(f, "The email address `{email}` is already in use by another account.")
            }
            Self::InvalidCredentials => write!(f, "Invalid email or password."),
            Self::Db(err) => write!(f, "identity store failure: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted account data: {message}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for AuthError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for AuthError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Identity collaborator consumed by the controller.
///
/// Successful `sign_up` and `sign_in` leave the new identity active;
/// every transition is announced to subscribers.
pub trait IdentityProvider {
    fn sign_up(&mut self, email: &str, password: &str) -> AuthResult<Identity>;
    fn sign_in(&mut self, email: &str, password: &str) -> AuthResult<Identity>;
    /// Ends the active session. Signing out with no session is a no-op.
    fn sign_out(&mut self) -> AuthResult<()>;
    /// Registers a listener and immediately sends the current state to it.
    fn subscribe(&mut self, listener: Sender<SessionChanged>);
}

/// Fan-out of session events to registered listeners.
#[derive(Debug, Default)]
pub struct SessionListeners {
    senders: Vec<Sender<SessionChanged>>,
}

impl SessionListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Sender<SessionChanged>, current: Option<&Identity>) {
        if listener.send(SessionChanged(current.cloned())).is_ok() {
            self.senders.push(listener);
        }
    }

    /// Sends one event to every live listener, dropping disconnected ones.
    pub fn notify(&mut self, current: Option<&Identity>) {
        self.senders
            .retain(|sender| sender.send(SessionChanged(current.cloned())).is_ok());
        debug!(
            "event=session_notify module=identity status=ok listeners={} signed_in={}",
            self.senders.len(),
            current.is_some()
        );
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

/// Lower-cases and trims an email, rejecting malformed input.
pub fn normalize_email(raw: &str) -> AuthResult<String> {
    let email = raw.trim().to_ascii_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AuthError::InvalidEmail(raw.trim().to_string()));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> AuthResult<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_email, validate_password, AuthError, SessionListeners};
    use crate::model::session::{Identity, OwnerId};
    use std::sync::mpsc::channel;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(
            normalize_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
    }

    #[test]
    fn normalize_email_rejects_malformed_input() {
        for raw in ["", "alice", "alice@", "@example.com", "a b@example.com"] {
            assert!(
                matches!(normalize_email(raw), Err(AuthError::InvalidEmail(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn validate_password_enforces_minimum_length() {
        assert!(matches!(
            validate_password("12345"),
            Err(AuthError::WeakPassword)
        ));
        validate_password("123456").unwrap();
    }

    #[test]
    fn listeners_receive_current_state_and_drop_disconnected() {
        let identity = Identity {
            uid: OwnerId::new("u1"),
            email: "a@b.co".to_string(),
        };
        let mut listeners = SessionListeners::new();

        let (tx_live, rx_live) = channel();
        let (tx_dead, rx_dead) = channel();
        listeners.add(tx_live, None);
        listeners.add(tx_dead, None);
        drop(rx_dead);
        assert_eq!(rx_live.recv().unwrap().0, None);

        listeners.notify(Some(&identity));
        assert_eq!(listeners.len(), 1);
        assert_eq!(rx_live.recv().unwrap().0, Some(identity));
    }
}
