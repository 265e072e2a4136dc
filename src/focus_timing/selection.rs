//! Mode and selection state
//!
//! What the next session will be: a session type, or a custom duration
//! (possibly seeded from a plan), plus tags. Frozen while a session runs.

use std::collections::BTreeSet;

use thiserror::Error;
use uuid::Uuid;

use super::countdown::{minutes_to_secs, DEFAULT_WORK_SECS, MAX_PHASE_MINUTES};
use crate::api::{FocusSession, Plan, SessionLength, SessionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    SessionType,
    Custom,
    SessionCompleted,
    CustomCompleted,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Idle => "Idle",
            Mode::SessionType => "Session type",
            Mode::Custom => "Custom",
            Mode::SessionCompleted => "Session completed",
            Mode::CustomCompleted => "Custom completed",
        }
    }
}

/// Why a selection change was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Selection is locked while a session is active")]
    Frozen,
    #[error("Tags come from the selected plan")]
    PlanSelected,
    #[error("Duration must be at least one minute")]
    InvalidDuration,
}

/// Runtime facts that freeze the selection
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionLock {
    pub is_running: bool,
    pub has_active_session: bool,
}

impl SelectionLock {
    pub fn is_frozen(&self) -> bool {
        self.is_running || self.has_active_session
    }
}

#[derive(Debug, Clone)]
pub struct ModeSelection {
    mode: Mode,
    session_type_id: Option<Uuid>,
    tags: BTreeSet<String>,
    plan_id: Option<Uuid>,
    custom_duration_secs: Option<u64>,
    display_secs: u64,
    /// Idle display and fallback session length
    default_work_secs: u64,
}

impl Default for ModeSelection {
    fn default() -> Self {
        Self::with_default_work(DEFAULT_WORK_SECS)
    }
}

impl ModeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle selection whose default length is `secs` (0 means 25 minutes)
    pub fn with_default_work(secs: u64) -> Self {
        let secs = if secs == 0 {
            DEFAULT_WORK_SECS
        } else {
            secs.min(MAX_PHASE_MINUTES * 60)
        };
        Self {
            mode: Mode::Idle,
            session_type_id: None,
            tags: BTreeSet::new(),
            plan_id: None,
            custom_duration_secs: None,
            display_secs: secs,
            default_work_secs: secs,
        }
    }

    pub fn default_work_secs(&self) -> u64 {
        self.default_work_secs
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session_type_id(&self) -> Option<Uuid> {
        self.session_type_id
    }

    pub fn plan_id(&self) -> Option<Uuid> {
        self.plan_id
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains(name)
    }

    pub fn custom_duration_secs(&self) -> Option<u64> {
        self.custom_duration_secs
    }

    /// Seconds shown while no countdown is running
    pub fn display_secs(&self) -> u64 {
        self.display_secs
    }

    /// Pick a session type; picking the selected one again deselects it
    pub fn select_session_type(
        &mut self,
        session_type: &SessionType,
        lock: SelectionLock,
    ) -> Result<(), SelectionError> {
        if lock.is_frozen() {
            return Err(SelectionError::Frozen);
        }

        if self.session_type_id == Some(session_type.id) {
            self.mode = Mode::Idle;
            self.session_type_id = None;
            self.display_secs = self.default_work_secs;
            return Ok(());
        }

        // Tags seeded by a plan leave with it
        if self.plan_id.take().is_some() {
            self.tags.clear();
        }
        self.mode = Mode::SessionType;
        self.session_type_id = Some(session_type.id);
        self.custom_duration_secs = None;
        self.display_secs = self.non_zero_or_default(session_type.work_duration);
        Ok(())
    }

    /// Switch to a custom duration in whole minutes
    pub fn set_custom_duration(
        &mut self,
        minutes: u64,
        lock: SelectionLock,
    ) -> Result<(), SelectionError> {
        if lock.is_frozen() {
            return Err(SelectionError::Frozen);
        }
        if minutes == 0 {
            return Err(SelectionError::InvalidDuration);
        }

        let secs = minutes_to_secs(minutes);
        self.mode = Mode::Custom;
        self.session_type_id = None;
        self.custom_duration_secs = Some(secs);
        self.display_secs = secs;
        Ok(())
    }

    /// Accept a plan as a custom session carrying the plan's tag
    ///
    /// Selecting the same plan again drops it and returns to idle.
    pub fn select_plan(&mut self, plan: &Plan, lock: SelectionLock) -> Result<(), SelectionError> {
        if lock.is_frozen() {
            return Err(SelectionError::Frozen);
        }

        if self.plan_id == Some(plan.id) {
            self.plan_id = None;
            self.tags.clear();
            self.mode = Mode::Idle;
            self.custom_duration_secs = None;
            self.display_secs = self.default_work_secs;
            return Ok(());
        }

        let secs = plan
            .duration_minutes
            .filter(|m| *m > 0)
            .map(minutes_to_secs)
            .unwrap_or(self.default_work_secs);

        self.mode = Mode::Custom;
        self.plan_id = Some(plan.id);
        self.session_type_id = None;
        self.custom_duration_secs = Some(secs);
        self.display_secs = secs;
        self.tags = plan.tag_name.iter().cloned().collect();
        Ok(())
    }

    /// Add or remove a tag by name
    pub fn toggle_tag(&mut self, name: &str, lock: SelectionLock) -> Result<(), SelectionError> {
        if lock.is_frozen() {
            return Err(SelectionError::Frozen);
        }
        if self.plan_id.is_some() {
            return Err(SelectionError::PlanSelected);
        }

        if !self.tags.remove(name) {
            self.tags.insert(name.to_string());
        }
        Ok(())
    }

    /// Back to the initial idle state showing the default work length
    pub fn reset(&mut self) {
        *self = Self::with_default_work(self.default_work_secs);
    }

    /// The final phase finished; clear the type and restore the default display
    pub fn mark_completed(&mut self, custom: bool) {
        self.mode = if custom {
            Mode::CustomCompleted
        } else {
            Mode::SessionCompleted
        };
        self.session_type_id = None;
        self.plan_id = None;
        self.custom_duration_secs = None;
        self.display_secs = self.default_work_secs;
    }

    /// Infer the selection from a recovered server session
    pub fn adopt(&mut self, session: &FocusSession) {
        self.tags = session.tag_names().into_iter().collect();
        self.plan_id = session.to_do_item_id;

        match session.session_type_id {
            Some(id) => {
                self.mode = Mode::SessionType;
                self.session_type_id = Some(id);
                self.custom_duration_secs = None;
            }
            None => {
                let secs = session
                    .custom_duration_seconds
                    .filter(|s| *s > 0)
                    .map(|s| s.min(MAX_PHASE_MINUTES * 60))
                    .unwrap_or(self.default_work_secs);
                self.mode = Mode::Custom;
                self.session_type_id = None;
                self.custom_duration_secs = Some(secs);
                self.display_secs = secs;
            }
        }
    }

    /// Length of the session to create: type, custom duration, or the default
    pub fn length(&self) -> SessionLength {
        match (self.mode, self.session_type_id, self.custom_duration_secs) {
            (Mode::SessionType, Some(id), _) => SessionLength::SessionType(id),
            (Mode::Custom, _, Some(secs)) if secs > 0 => SessionLength::Custom(secs),
            _ => SessionLength::Custom(self.default_work_secs),
        }
    }

    fn non_zero_or_default(&self, secs: u64) -> u64 {
        if secs == 0 {
            self.default_work_secs
        } else {
            secs
        }
    }
}
