//! SQLite-backed identity provider.
//!
//! # Invariants
//! - Passwords are stored only as salted blake3 digests.
//! - The active session survives reopen via the single-row `active_session`.
//! - Credentials are never logged.

use crate::identity::provider::{
    normalize_email, validate_password, AuthError, AuthResult, IdentityProvider, SessionListeners,
};
use crate::model::session::{Identity, OwnerId, SessionChanged};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::mpsc::Sender;
use uuid::Uuid;

pub struct SqliteIdentityProvider {
    conn: Connection,
    current: Option<Identity>,
    listeners: SessionListeners,
}

impl SqliteIdentityProvider {
    /// Wraps a migrated connection and restores any persisted session.
    pub fn new(conn: Connection) -> AuthResult<Self> {
        let current = load_active_session(&conn)?;
        info!(
            "event=identity_open module=identity status=ok restored_session={}",
            current.is_some()
        );
        Ok(Self {
            conn,
            current,
            listeners: SessionListeners::new(),
        })
    }

    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    fn activate(&mut self, identity: Identity) -> AuthResult<Identity> {
        self.conn.execute(
            "INSERT INTO active_session (slot, uid) VALUES (1, ?1)
             ON CONFLICT(slot) DO UPDATE SET uid = excluded.uid;",
            [identity.uid.as_str()],
        )?;
        self.current = Some(identity.clone());
        self.listeners.notify(self.current.as_ref());
        Ok(identity)
    }
}

impl IdentityProvider for SqliteIdentityProvider {
    fn sign_up(&mut self, email: &str, password: &str) -> AuthResult<Identity> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = ?1);",
            [email.as_str()],
            |row| row.get(0),
        )?;
        if exists {
            warn!("event=auth_sign_up module=identity status=error error_code=email_in_use");
            return Err(AuthError::EmailInUse(email));
        }

        let uid = Uuid::new_v4().simple().to_string();
        let salt = Uuid::new_v4().simple().to_string();
        let digest = password_digest(&salt, password);
        self.conn.execute(
            "INSERT INTO accounts (uid, email, password_salt, password_digest)
             VALUES (?1, ?2, ?3, ?4);",
            params![uid, email, salt, digest.to_hex().as_str()],
        )?;

        info!("event=auth_sign_up module=identity status=ok");
        self.activate(Identity {
            uid: OwnerId::new(uid),
            email,
        })
    }

    fn sign_in(&mut self, email: &str, password: &str) -> AuthResult<Identity> {
        let email = normalize_email(email)?;

        let row = self
            .conn
            .query_row(
                "SELECT uid, password_salt, password_digest FROM accounts WHERE email = ?1;",
                [email.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((uid, salt, stored_hex)) = row else {
            warn!("event=auth_sign_in module=identity status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        };
        let stored = blake3::Hash::from_hex(stored_hex.as_str())
            .map_err(|err| AuthError::InvalidData(format!("password digest for {uid}: {err}")))?;

        // blake3::Hash equality is constant-time.
        if password_digest(&salt, password) != stored {
            warn!("event=auth_sign_in module=identity status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        }

        info!("event=auth_sign_in module=identity status=ok");
        self.activate(Identity {
            uid: OwnerId::new(uid),
            email,
        })
    }

    fn sign_out(&mut self) -> AuthResult<()> {
        if self.current.is_none() {
            return Ok(());
        }
        self.conn
            .execute("DELETE FROM active_session WHERE slot = 1;", [])?;
        self.current = None;
        self.listeners.notify(None);
        info!("event=auth_sign_out module=identity status=ok");
        Ok(())
    }

    fn subscribe(&mut self, listener: Sender<SessionChanged>) {
        self.listeners.add(listener, self.current.as_ref());
    }
}

fn password_digest(salt: &str, password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize()
}

fn load_active_session(conn: &Connection) -> AuthResult<Option<Identity>> {
    let identity = conn
        .query_row(
            "SELECT a.uid, a.email
             FROM active_session s
             JOIN accounts a ON a.uid = s.uid
             WHERE s.slot = 1;",
            [],
            |row| {
                Ok(Identity {
                    uid: OwnerId::new(row.get::<_, String>(0)?),
                    email: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(identity)
}
