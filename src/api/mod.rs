//! Remote session API
//!
//! The rest of the crate talks to the server through [`SessionApi`], which
//! [`ApiClient`] implements over HTTP. Tests substitute an in-memory fake.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::{Credentials, TokenSource};
pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    Badge, CreateSessionRequest, FocusSession, Plan, SessionId, SessionLength, SessionStatus,
    SessionType, Tag,
};

/// Operations the focus timer needs from the server
///
/// Used generically (`FocusController<A: SessionApi>`), never as a trait object.
#[allow(async_fn_in_trait)]
pub trait SessionApi {
    /// `POST /FocusSession`
    async fn create_session(&self, request: &CreateSessionRequest)
        -> Result<FocusSession, ApiError>;

    /// `PATCH /FocusSession/{id}/status`
    async fn update_status(&self, id: SessionId, status: SessionStatus) -> Result<(), ApiError>;

    /// `POST /FocusSession/{id}/transition-state`
    async fn transition_state(&self, id: SessionId) -> Result<FocusSession, ApiError>;

    /// `GET /FocusSession/ongoing`, `None` when the server has no active session
    async fn fetch_ongoing(&self) -> Result<Option<FocusSession>, ApiError>;

    async fn list_session_types(&self) -> Result<Vec<SessionType>, ApiError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError>;

    async fn list_plans(&self) -> Result<Vec<Plan>, ApiError>;

    async fn list_badges(&self) -> Result<Vec<Badge>, ApiError>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory [`SessionApi`] that records calls

    use super::*;
    use chrono::{Duration, Utc};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Create(CreateSessionRequest),
        UpdateStatus(SessionId, SessionStatus),
        Transition(SessionId),
        FetchOngoing,
    }

    #[derive(Debug, Default)]
    pub struct FakeState {
        pub calls: Vec<Call>,
        /// Every call fails with a server error while set
        pub fail: bool,
        pub ongoing: Option<FocusSession>,
        /// Returned by the next transition, otherwise a derived Break/Working flip
        pub next_transition: Option<FocusSession>,
        pub session_types: Vec<SessionType>,
        pub tags: Vec<Tag>,
        pub plans: Vec<Plan>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct FakeApi {
        pub state: Arc<Mutex<FakeState>>,
    }

    impl FakeApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_fail(&self, fail: bool) {
            self.state.lock().unwrap().fail = fail;
        }

        pub fn calls(&self) -> Vec<Call> {
            self.state.lock().unwrap().calls.clone()
        }

        fn record(&self, call: Call) -> Result<(), ApiError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call);
            if state.fail {
                Err(ApiError::Server(500))
            } else {
                Ok(())
            }
        }
    }

    /// A session whose current phase ends `secs` from now
    pub fn session_ending_in(status: SessionStatus, secs: i64) -> FocusSession {
        FocusSession {
            id: Uuid::new_v4(),
            status,
            current_state_end_time: Some(Utc::now() + Duration::seconds(secs)),
            completed_cycles: 0,
            session_type_id: None,
            custom_duration_seconds: Some(1500),
            tags: vec![],
            to_do_item_id: None,
        }
    }

    impl SessionApi for FakeApi {
        async fn create_session(
            &self,
            request: &CreateSessionRequest,
        ) -> Result<FocusSession, ApiError> {
            self.record(Call::Create(request.clone()))?;
            let mut session = session_ending_in(SessionStatus::Working, 1500);
            match request.length {
                SessionLength::SessionType(id) => {
                    session.session_type_id = Some(id);
                    session.custom_duration_seconds = None;
                }
                SessionLength::Custom(secs) => {
                    session.custom_duration_seconds = Some(secs);
                    session.current_state_end_time =
                        Some(Utc::now() + Duration::seconds(secs as i64));
                }
            }
            session.to_do_item_id = request.to_do_item_id;
            Ok(session)
        }

        async fn update_status(
            &self,
            id: SessionId,
            status: SessionStatus,
        ) -> Result<(), ApiError> {
            self.record(Call::UpdateStatus(id, status))
        }

        async fn transition_state(&self, id: SessionId) -> Result<FocusSession, ApiError> {
            self.record(Call::Transition(id))?;
            let mut state = self.state.lock().unwrap();
            let mut next = state
                .next_transition
                .take()
                .unwrap_or_else(|| session_ending_in(SessionStatus::Break, 300));
            next.id = id;
            Ok(next)
        }

        async fn fetch_ongoing(&self) -> Result<Option<FocusSession>, ApiError> {
            self.record(Call::FetchOngoing)?;
            Ok(self.state.lock().unwrap().ongoing.clone())
        }

        async fn list_session_types(&self) -> Result<Vec<SessionType>, ApiError> {
            let state = self.state.lock().unwrap();
            if state.fail {
                return Err(ApiError::Server(500));
            }
            Ok(state.session_types.clone())
        }

        async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
            let state = self.state.lock().unwrap();
            if state.fail {
                return Err(ApiError::Server(500));
            }
            Ok(state.tags.clone())
        }

        async fn list_plans(&self) -> Result<Vec<Plan>, ApiError> {
            let state = self.state.lock().unwrap();
            if state.fail {
                return Err(ApiError::Server(500));
            }
            Ok(state.plans.clone())
        }

        async fn list_badges(&self) -> Result<Vec<Badge>, ApiError> {
            Ok(vec![])
        }
    }
}
