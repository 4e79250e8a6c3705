//! Signed-in session, persisted to a small JSON file so the access token
//! survives between invocations of the binary.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::api::auth;
use crate::error::{FlowError, FlowResult};
use crate::guard::{self, GuardError, Section};
use crate::http::HttpClient;
use crate::models::Role;
use crate::validation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionFileError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Session state plus the file it is mirrored to
pub struct SessionStore {
    http: HttpClient,
    path: PathBuf,
    session: Option<Session>,
    pub submitting: bool,
    pub error: Option<String>,
}

impl SessionStore {
    /// Open the store, restoring a previous session from `path` if one exists.
    ///
    /// A file that cannot be parsed is ignored so a corrupt session never
    /// locks the user out of signing in again.
    pub fn open(http: HttpClient, path: impl Into<PathBuf>) -> Result<Self, SessionFileError> {
        let path = path.into();
        let session = read_session(&path)?;

        if let Some(token) = session.as_ref().and_then(|s| s.access_token.clone()) {
            http.set_access_token(Some(token));
        }
        if let Some(s) = &session {
            debug!("Restored session for user {} ({})", s.user_id, s.role);
        }

        Ok(Self {
            http,
            path,
            session,
            submitting: false,
            error: None,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.role)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.access_token.is_some())
            .unwrap_or(false)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check the current role against a guarded section.
    ///
    /// A session without an access token counts as signed out.
    pub fn require(&self, section: Section) -> Result<&Session, GuardError> {
        let session = self
            .session
            .as_ref()
            .filter(|s| s.access_token.is_some())
            .ok_or(GuardError::NotSignedIn)?;
        guard::check(Some(session.role), section)?;
        Ok(session)
    }

    pub async fn login(&mut self, phone: &str, password: &str) -> FlowResult<&Session> {
        let phone = validation::phone(phone)?;
        let password = validation::required("password", password)?;

        self.submitting = true;
        self.error = None;
        let result = auth::login(&self.http, &phone, &password).await;
        self.submitting = false;

        let response = result.map_err(|e| self.fail(e.into()))?;

        info!("🔑 Signed in as {} ({})", response.user_id, response.role);
        self.http.set_access_token(Some(response.access_token.clone()));
        self.session = Some(Session {
            user_id: response.user_id,
            role: response.role,
            phone: Some(phone),
            access_token: Some(response.access_token),
        });
        // Signed in only if the session file agrees
        if let Err(e) = self.persist() {
            self.session = None;
            self.http.set_access_token(None);
            return Err(self.fail(e));
        }

        self.session
            .as_ref()
            .ok_or(FlowError::InvalidState("NOT_SIGNED_IN"))
    }

    /// Create an account; the caller signs in separately afterwards
    pub async fn register(
        &mut self,
        phone: &str,
        password: &str,
        role: Role,
    ) -> FlowResult<auth::RegisterResponse> {
        let phone = validation::phone(phone)?;
        let password = validation::required("password", password)?;

        self.submitting = true;
        self.error = None;
        let result = auth::register(&self.http, &phone, &password, role).await;
        self.submitting = false;

        let response = result.map_err(|e| self.fail(e.into()))?;
        info!("Registered user {} ({})", response.user_id, response.role);
        Ok(response)
    }

    /// Reload the profile behind the current token.
    ///
    /// A 401 means the token is no longer accepted and the session is dropped.
    pub async fn refresh(&mut self) -> FlowResult<&Session> {
        if !self.is_signed_in() {
            return Err(FlowError::InvalidState("NOT_SIGNED_IN"));
        }

        self.submitting = true;
        let result = auth::me(&self.http).await;
        self.submitting = false;

        match result {
            Ok(me) => {
                if let Some(session) = self.session.as_mut() {
                    session.user_id = me.user_id;
                    session.role = me.role;
                    if me.phone.is_some() {
                        session.phone = me.phone;
                    }
                }
                self.persist()?;
            }
            Err(e) => {
                if e.status() == Some(401) {
                    warn!("Session rejected by backend, signing out locally");
                    self.clear()?;
                }
                return Err(self.fail(e.into()));
            }
        }

        self.session
            .as_ref()
            .ok_or(FlowError::InvalidState("NOT_SIGNED_IN"))
    }

    /// Sign out. The local session is cleared even if the backend call fails.
    pub async fn logout(&mut self) -> FlowResult<()> {
        if self.is_signed_in() {
            self.submitting = true;
            if let Err(e) = auth::logout(&self.http).await {
                warn!("Logout request failed: {}", e);
            }
            self.submitting = false;
        }

        self.clear()?;
        info!("Signed out");
        Ok(())
    }

    fn clear(&mut self) -> FlowResult<()> {
        self.session = None;
        self.http.set_access_token(None);
        self.persist()
    }

    fn persist(&self) -> FlowResult<()> {
        write_session(&self.path, self.session.as_ref()).map_err(FlowError::from)
    }

    fn fail(&mut self, err: FlowError) -> FlowError {
        self.error = Some(err.to_string());
        err
    }
}

fn read_session(path: &Path) -> Result<Option<Session>, SessionFileError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SessionFileError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match serde_json::from_str(&raw) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

fn write_session(path: &Path, session: Option<&Session>) -> Result<(), SessionFileError> {
    let io_err = |source| SessionFileError::Io {
        path: path.to_path_buf(),
        source,
    };

    let Some(session) = session else {
        return match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(io_err(e)),
            _ => Ok(()),
        };
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(session)?;
    fs::write(path, json).map_err(io_err)
}
