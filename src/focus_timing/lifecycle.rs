//! Session lifecycle manager
//!
//! Owns the single active session and the ongoing-session slot filled at
//! startup. Every API failure is logged and turned into `None`/`false`; the
//! user retries by repeating the action.

use tracing::{error, info, warn};

use super::selection::ModeSelection;
use crate::api::{
    CreateSessionRequest, FocusSession, SessionApi, SessionId, SessionStatus, Tag,
};

/// Build the creation payload from the current selection
///
/// Tag names are resolved against the catalog; unknown names are skipped.
pub fn build_request(selection: &ModeSelection, catalog: &[Tag]) -> CreateSessionRequest {
    let tag_ids = selection
        .tags()
        .iter()
        .filter_map(|name| catalog.iter().find(|t| &t.name == name).map(|t| t.id))
        .collect();

    CreateSessionRequest {
        length: selection.length(),
        tag_ids,
        to_do_item_id: selection.plan_id(),
    }
}

#[derive(Debug)]
pub struct SessionLifecycle<A> {
    api: A,
    active: Option<FocusSession>,
    ongoing: Option<FocusSession>,
}

impl<A: SessionApi> SessionLifecycle<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            active: None,
            ongoing: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn active(&self) -> Option<&FocusSession> {
        self.active.as_ref()
    }

    pub fn ongoing(&self) -> Option<&FocusSession> {
        self.ongoing.as_ref()
    }

    /// Create a session from the selection and make it active
    ///
    /// Refuses while a session is already active or awaiting recovery.
    pub async fn create_session(
        &mut self,
        selection: &ModeSelection,
        catalog: &[Tag],
    ) -> Option<FocusSession> {
        if self.active.is_some() || self.ongoing.is_some() {
            warn!("Refusing to create a session while another one is active");
            return None;
        }

        let request = build_request(selection, catalog);
        match self.api.create_session(&request).await {
            Ok(session) => {
                info!(session_id = %session.id, length = ?request.length, "Focus session created");
                self.active = Some(session.clone());
                Some(session)
            }
            Err(e) => {
                error!("Failed to create focus session: {}", e);
                None
            }
        }
    }

    /// Mark a session cancelled on the server; local state is untouched
    pub async fn cancel_session(&self, id: SessionId) -> bool {
        self.patch_status(id, SessionStatus::Cancelled).await
    }

    /// Mark a session completed on the server; local state is untouched
    pub async fn complete_session(&self, id: SessionId) -> bool {
        self.patch_status(id, SessionStatus::Completed).await
    }

    async fn patch_status(&self, id: SessionId, status: SessionStatus) -> bool {
        match self.api.update_status(id, status).await {
            Ok(()) => {
                info!(session_id = %id, status = status.as_str(), "Session status updated");
                true
            }
            Err(e) => {
                error!(session_id = %id, "Failed to set session {}: {}", status.as_str(), e);
                false
            }
        }
    }

    /// Cancel the active session and drop it only once the server agreed
    ///
    /// Returns true when nothing was active.
    pub async fn cancel_active(&mut self) -> bool {
        let Some(id) = self.active.as_ref().map(|s| s.id) else {
            return true;
        };
        let ok = self.cancel_session(id).await;
        if ok {
            self.active = None;
        }
        ok
    }

    /// Complete the active session and drop it only once the server agreed
    pub async fn complete_active(&mut self) -> bool {
        let Some(id) = self.active.as_ref().map(|s| s.id) else {
            return false;
        };
        let ok = self.complete_session(id).await;
        if ok {
            self.active = None;
        }
        ok
    }

    /// Advance the active session to its next phase
    ///
    /// The server's view replaces the stored session.
    pub async fn transition_state(&mut self) -> Option<FocusSession> {
        let id = self.active.as_ref()?.id;
        match self.api.transition_state(id).await {
            Ok(next) => {
                info!(
                    session_id = %id,
                    status = next.status.as_str(),
                    completed_cycles = next.completed_cycles,
                    "Session transitioned"
                );
                self.active = Some(next.clone());
                Some(next)
            }
            Err(e) => {
                error!(session_id = %id, "Failed to transition session: {}", e);
                None
            }
        }
    }

    /// Ask the server for a session left running by a previous run
    pub async fn load_ongoing(&mut self) -> Option<&FocusSession> {
        match self.api.fetch_ongoing().await {
            Ok(Some(session)) if session.status.is_active() => {
                info!(session_id = %session.id, "Found ongoing session");
                self.ongoing = Some(session);
            }
            Ok(_) => {
                self.ongoing = None;
            }
            Err(e) => {
                warn!("Failed to check for an ongoing session: {}", e);
                self.ongoing = None;
            }
        }
        self.ongoing.as_ref()
    }

    /// Move the ongoing session into the active slot
    pub fn adopt_ongoing(&mut self) -> Option<FocusSession> {
        let session = self.ongoing.take()?;
        info!(session_id = %session.id, "Resuming ongoing session");
        self.active = Some(session.clone());
        Some(session)
    }

    /// Cancel the ongoing session; the slot is kept if the server refuses
    pub async fn discard_ongoing(&mut self) -> bool {
        let Some(id) = self.ongoing.as_ref().map(|s| s.id) else {
            return true;
        };
        let ok = self.cancel_session(id).await;
        if ok {
            self.ongoing = None;
        }
        ok
    }

    /// Forget the active session without telling the server
    pub fn clear_active(&mut self) {
        self.active = None;
    }
}
