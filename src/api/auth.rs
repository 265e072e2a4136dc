//! Access token handling
//!
//! The token comes from `POMOTUI_TOKEN` or, failing that, the configured token
//! file. On a 401 the client asks for a refresh, which re-reads the source once.
//! A second rejection signs the user out for the rest of the run.

use std::path::PathBuf;
use std::sync::RwLock;

use super::error::ApiError;

/// Environment variable that overrides the token file
pub const TOKEN_ENV_VAR: &str = "POMOTUI_TOKEN";

/// Where the bearer token is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Env var first, then the file
    EnvOrFile(PathBuf),
    /// Fixed token, mostly for tests
    Static(String),
}

impl TokenSource {
    fn read(&self) -> Option<String> {
        match self {
            TokenSource::EnvOrFile(path) => std::env::var(TOKEN_ENV_VAR)
                .ok()
                .or_else(|| std::fs::read_to_string(path).ok())
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            TokenSource::Static(token) => Some(token.clone()),
        }
    }
}

#[derive(Debug)]
enum TokenState {
    Available(String),
    Missing,
    SignedOut,
}

/// Bearer credentials shared by all requests of one client
#[derive(Debug)]
pub struct Credentials {
    source: TokenSource,
    state: RwLock<TokenState>,
}

impl Credentials {
    /// Load credentials from the given source
    pub fn load(source: TokenSource) -> Self {
        let state = match source.read() {
            Some(token) => TokenState::Available(token),
            None => TokenState::Missing,
        };
        Self {
            source,
            state: RwLock::new(state),
        }
    }

    /// Current token, or the reason there is none
    pub fn token(&self) -> Result<String, ApiError> {
        let state = self.state.read().map_err(|_| ApiError::MissingToken)?;
        match &*state {
            TokenState::Available(token) => Ok(token.clone()),
            TokenState::Missing => Err(ApiError::MissingToken),
            TokenState::SignedOut => Err(ApiError::Unauthorized),
        }
    }

    /// Re-read the token source after a 401
    ///
    /// Returns the token to replay with; signs out when nothing usable is found.
    pub fn refresh(&self) -> Result<String, ApiError> {
        match self.source.read() {
            Some(token) => {
                if let Ok(mut state) = self.state.write() {
                    *state = TokenState::Available(token.clone());
                }
                Ok(token)
            }
            None => {
                self.sign_out();
                Err(ApiError::Unauthorized)
            }
        }
    }

    /// Drop the token; later calls fail with `Unauthorized` without hitting the network
    pub fn sign_out(&self) {
        if let Ok(mut state) = self.state.write() {
            if !matches!(*state, TokenState::SignedOut) {
                tracing::warn!("Access token rejected, signing out");
            }
            *state = TokenState::SignedOut;
        }
    }

    /// Whether a previous rejection signed the user out
    pub fn is_signed_out(&self) -> bool {
        self.state
            .read()
            .map(|s| matches!(*s, TokenState::SignedOut))
            .unwrap_or(false)
    }
}
