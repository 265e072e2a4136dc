//! Focus session orchestration
//!
//! The one place that knows what a countdown reaching zero means. Wires the
//! countdowns, the selection and the lifecycle manager together and decides
//! which dialog the user sees next.

use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use super::classify::{classify, is_final_cycle, Completion};
use super::countdown::{
    minutes_to_secs, CountdownEngine, CountdownSource, TimerDisplay, TimerEvent,
    TimerEventSender, DEFAULT_BREAK_SECS, DEFAULT_TICK_INTERVAL, DEFAULT_WORK_SECS,
};
use super::lifecycle::SessionLifecycle;
use super::selection::{ModeSelection, SelectionError, SelectionLock};
use super::ui_break::UiBreakTimer;
use crate::api::{Badge, FocusSession, Plan, SessionApi, SessionStatus, SessionType, Tag};

/// Tunables taken from the config
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Idle display and fallback session length
    pub default_work_minutes: u64,
    pub break_presets_minutes: Vec<u64>,
    pub default_break_minutes: u64,
    pub tick_interval: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            default_work_minutes: DEFAULT_WORK_SECS / 60,
            break_presets_minutes: vec![5, 10, 15],
            default_break_minutes: DEFAULT_BREAK_SECS / 60,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Reference data loaded at startup
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub session_types: Vec<SessionType>,
    pub tags: Vec<Tag>,
    pub plans: Vec<Plan>,
    pub badges: Vec<Badge>,
}

impl Catalog {
    pub fn session_type(&self, id: Option<Uuid>) -> Option<&SessionType> {
        let id = id?;
        self.session_types.iter().find(|st| st.id == id)
    }
}

/// What a reset confirmation would tear down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetVariant {
    Session,
    UiBreak,
}

/// Dialog currently shown; at most one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    RecoverOngoing,
    ConfirmReset(ResetVariant),
    CustomDuration,
    CustomWorkComplete,
    LastCycleWorkComplete,
    SessionComplete,
    CustomBreakComplete,
}

/// Message for the user, drained by the app after each action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
    /// A countdown ran out; rings the bell when enabled
    TimerFinished(String),
}

/// Which countdown drives the progress gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Work,
    Break,
    UiBreak,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Ready",
            Phase::Work => "Focus",
            Phase::Break => "Break",
            Phase::UiBreak => "Break (local)",
        }
    }
}

#[derive(Debug)]
pub struct FocusController<A> {
    lifecycle: SessionLifecycle<A>,
    selection: ModeSelection,
    session_countdown: CountdownEngine,
    ui_break: UiBreakTimer,
    is_running: bool,
    modal: Option<Modal>,
    catalog: Catalog,
    settings: ControllerSettings,
    notices: Vec<Notice>,
}

impl<A: SessionApi> FocusController<A> {
    pub fn new(api: A, tx: TimerEventSender, settings: ControllerSettings) -> Self {
        Self {
            lifecycle: SessionLifecycle::new(api),
            selection: ModeSelection::with_default_work(minutes_to_secs(
                settings.default_work_minutes,
            )),
            session_countdown: CountdownEngine::new(
                CountdownSource::Session,
                tx.clone(),
                settings.tick_interval,
            ),
            ui_break: UiBreakTimer::new(tx, settings.tick_interval, settings.default_break_minutes),
            is_running: false,
            modal: None,
            catalog: Catalog::default(),
            settings,
            notices: Vec::new(),
        }
    }

    // ---- accessors ----

    pub fn selection(&self) -> &ModeSelection {
        &self.selection
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn modal(&self) -> Option<Modal> {
        self.modal
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn active_session(&self) -> Option<&FocusSession> {
        self.lifecycle.active()
    }

    pub fn ongoing_session(&self) -> Option<&FocusSession> {
        self.lifecycle.ongoing()
    }

    pub fn is_ui_break_active(&self) -> bool {
        self.ui_break.is_active()
    }

    pub fn lock(&self) -> SelectionLock {
        SelectionLock {
            is_running: self.is_running,
            has_active_session: self.lifecycle.active().is_some(),
        }
    }

    pub fn is_selection_frozen(&self) -> bool {
        self.lock().is_frozen()
    }

    /// Drain messages produced since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Display of whichever countdown is the current progress source
    pub fn display(&self) -> TimerDisplay {
        if self.ui_break.is_active() {
            return self.ui_break.display();
        }
        if self.lifecycle.active().is_some() && self.session_countdown.end_time().is_some() {
            return self.session_countdown.display();
        }
        TimerDisplay::full(self.selection.display_secs())
    }

    pub fn phase(&self) -> Phase {
        if self.ui_break.is_active() {
            return Phase::UiBreak;
        }
        match self.lifecycle.active().map(|s| s.status) {
            Some(SessionStatus::Working) => Phase::Work,
            Some(SessionStatus::Break) => Phase::Break,
            _ => Phase::Idle,
        }
    }

    /// `(current, total)` cycle for session-type sessions
    pub fn cycle_position(&self) -> Option<(u32, u32)> {
        let session = self.lifecycle.active()?;
        let st = self.catalog.session_type(session.session_type_id)?;
        let total = st.number_of_cycles.max(1);
        Some(((session.completed_cycles + 1).min(total), total))
    }

    // ---- startup ----

    /// Fetch session types, tags, plans and badges; failures leave lists empty
    pub async fn load_catalog(&mut self) {
        let api = self.lifecycle.api();

        let session_types = api.list_session_types().await;
        let tags = api.list_tags().await;
        let plans = api.list_plans().await;
        let badges = api.list_badges().await;

        let mut signed_out = false;
        self.catalog.session_types = unwrap_list("session types", session_types, &mut signed_out);
        self.catalog.tags = unwrap_list("tags", tags, &mut signed_out);
        self.catalog.plans = unwrap_list("plans", plans, &mut signed_out)
            .into_iter()
            .filter(|p| !p.is_completed)
            .collect();
        self.catalog.badges = unwrap_list("badges", badges, &mut signed_out);

        if signed_out {
            self.notices.push(Notice::Error(
                "Not signed in: set POMOTUI_TOKEN or update the token file".to_string(),
            ));
        }
    }

    /// Check for a session left running; prompts for recovery if found
    pub async fn recover_ongoing(&mut self) {
        if self.lifecycle.load_ongoing().await.is_some() {
            self.modal = Some(Modal::RecoverOngoing);
        }
    }

    /// Resume the ongoing session where the server says it is
    pub fn continue_ongoing(&mut self) {
        if self.modal != Some(Modal::RecoverOngoing) {
            return;
        }
        self.modal = None;

        let Some(session) = self.lifecycle.adopt_ongoing() else {
            return;
        };
        self.selection.adopt(&session);
        self.start_countdown(&session);
        self.is_running = true;
        self.notices
            .push(Notice::Info("Resumed ongoing session".to_string()));
    }

    /// Cancel the ongoing session on the server; dialog stays open on failure
    pub async fn discard_ongoing(&mut self) {
        if self.modal != Some(Modal::RecoverOngoing) {
            return;
        }
        if self.lifecycle.discard_ongoing().await {
            self.modal = None;
            self.notices
                .push(Notice::Info("Discarded ongoing session".to_string()));
        } else {
            self.notices.push(Notice::Error(
                "Could not cancel the ongoing session, try again".to_string(),
            ));
        }
    }

    // ---- user actions ----

    /// Start a session from the current selection
    pub async fn start(&mut self) {
        if self.modal.is_some() || self.is_running || self.ui_break.is_active() {
            return;
        }

        if self.lifecycle.ongoing().is_some() {
            self.modal = Some(Modal::RecoverOngoing);
            return;
        }

        // A session whose phase ended but could not be advanced: retry its expiry
        if let Some(session) = self.lifecycle.active().cloned() {
            self.start_countdown(&session);
            self.is_running = true;
            return;
        }

        let Some(session) = self
            .lifecycle
            .create_session(&self.selection, &self.catalog.tags)
            .await
        else {
            self.notices.push(Notice::Error(
                "Could not start the session, try again".to_string(),
            ));
            return;
        };

        self.start_countdown(&session);
        self.is_running = true;
        self.notices.push(Notice::Info("Focus session started".to_string()));
    }

    /// Reset; asks for confirmation when something is running
    pub fn request_reset(&mut self) {
        if self.modal.is_some() {
            return;
        }
        if self.ui_break.is_active() {
            self.modal = Some(Modal::ConfirmReset(ResetVariant::UiBreak));
        } else if self.lifecycle.active().is_some() {
            self.modal = Some(Modal::ConfirmReset(ResetVariant::Session));
        } else {
            self.restore_defaults();
        }
    }

    /// Carry out a confirmed reset
    pub async fn confirm_reset(&mut self) {
        match self.modal {
            Some(Modal::ConfirmReset(ResetVariant::UiBreak)) => {
                self.modal = None;
                self.ui_break.reset();
                self.restore_defaults();
                info!("Break reset");
            }
            Some(Modal::ConfirmReset(ResetVariant::Session)) => {
                self.modal = None;
                if self.lifecycle.cancel_active().await {
                    self.restore_defaults();
                    self.notices
                        .push(Notice::Warning("Session cancelled".to_string()));
                } else {
                    self.notices.push(Notice::Error(
                        "Could not cancel the session, try again".to_string(),
                    ));
                }
            }
            _ => {}
        }
    }

    /// Close a dialog that has no side effects
    pub fn cancel_modal(&mut self) {
        if matches!(
            self.modal,
            Some(Modal::ConfirmReset(_)) | Some(Modal::CustomDuration)
        ) {
            self.modal = None;
        }
    }

    pub fn open_custom_duration(&mut self) {
        if self.modal.is_some() {
            return;
        }
        if self.is_selection_frozen() {
            self.notices
                .push(Notice::Warning(SelectionError::Frozen.to_string()));
            return;
        }
        self.modal = Some(Modal::CustomDuration);
    }

    pub fn apply_custom_duration(&mut self, minutes: u64) -> Result<(), SelectionError> {
        let lock = self.lock();
        self.selection.set_custom_duration(minutes, lock)?;
        if self.modal == Some(Modal::CustomDuration) {
            self.modal = None;
        }
        Ok(())
    }

    pub fn select_session_type(&mut self, index: usize) -> Result<(), SelectionError> {
        let lock = self.lock();
        let Some(st) = self.catalog.session_types.get(index) else {
            return Ok(());
        };
        self.selection.select_session_type(st, lock)
    }

    pub fn toggle_tag(&mut self, index: usize) -> Result<(), SelectionError> {
        let lock = self.lock();
        let Some(tag) = self.catalog.tags.get(index) else {
            return Ok(());
        };
        self.selection.toggle_tag(&tag.name, lock)
    }

    pub fn select_plan(&mut self, index: usize) -> Result<(), SelectionError> {
        let lock = self.lock();
        let Some(plan) = self.catalog.plans.get(index) else {
            return Ok(());
        };
        self.selection.select_plan(plan, lock)
    }

    /// After the final work phase: take one more break
    pub async fn take_last_break(&mut self) {
        if self.modal != Some(Modal::LastCycleWorkComplete) {
            return;
        }
        self.modal = None;
        self.advance().await;
    }

    /// Finish now instead of taking another break
    pub async fn finish_session(&mut self) {
        match self.modal {
            Some(Modal::LastCycleWorkComplete) => {
                if self.lifecycle.complete_active().await {
                    self.session_countdown.stop();
                    self.is_running = false;
                    self.selection.mark_completed(false);
                    self.modal = Some(Modal::SessionComplete);
                    self.notices
                        .push(Notice::Success("Session complete".to_string()));
                } else {
                    self.notices.push(Notice::Error(
                        "Could not complete the session, try again".to_string(),
                    ));
                }
            }
            Some(Modal::CustomWorkComplete) => {
                self.modal = None;
            }
            _ => {}
        }
    }

    /// Start a local break from the preset at `preset` (0-based)
    pub fn take_ui_break(&mut self, preset: usize) {
        if self.modal != Some(Modal::CustomWorkComplete) {
            return;
        }
        let minutes = self
            .settings
            .break_presets_minutes
            .get(preset)
            .copied()
            .unwrap_or(self.settings.default_break_minutes);

        self.modal = None;
        self.ui_break.start(minutes);
        self.is_running = self.ui_break.is_active();
    }

    /// Dismiss a completion dialog
    pub fn acknowledge(&mut self) {
        match self.modal {
            Some(Modal::SessionComplete) => {
                self.modal = None;
            }
            Some(Modal::CustomBreakComplete) => {
                self.modal = None;
                self.ui_break.reset();
            }
            _ => {}
        }
    }

    // ---- timer events ----

    /// Route a ticker event to its countdown and react to expiry
    pub async fn handle_timer_event(&mut self, event: TimerEvent) {
        match event.source() {
            CountdownSource::Session => {
                if !self.session_countdown.accept(&event) {
                    return;
                }
                if matches!(event, TimerEvent::Expired { .. }) {
                    self.on_session_expired().await;
                }
            }
            CountdownSource::UiBreak => {
                if self.ui_break.accept(&event) {
                    self.on_ui_break_expired();
                }
            }
        }
    }

    async fn on_session_expired(&mut self) {
        let Some(session) = self.lifecycle.active().cloned() else {
            return;
        };
        let session_type = self.catalog.session_type(session.session_type_id).cloned();
        let Some(completion) = classify(&session, session_type.as_ref()) else {
            return;
        };

        info!(session_id = %session.id, ?completion, "Phase finished");
        let message = match session.status {
            SessionStatus::Break => "Break is over",
            _ => "Focus block finished",
        };
        self.notices.push(Notice::TimerFinished(message.to_string()));

        match completion {
            Completion::CustomWorkComplete => {
                self.is_running = false;
                if self.lifecycle.complete_active().await {
                    self.selection.mark_completed(true);
                    self.modal = Some(Modal::CustomWorkComplete);
                } else {
                    self.notices.push(Notice::Error(
                        "Could not complete the session, press Space to retry".to_string(),
                    ));
                }
            }
            Completion::LastCycleWorkToBreak => {
                self.is_running = false;
                self.modal = Some(Modal::LastCycleWorkComplete);
            }
            Completion::WorkToBreak
            | Completion::LastCycleBreakComplete
            | Completion::BreakToWork => {
                self.advance().await;
            }
        }
    }

    fn on_ui_break_expired(&mut self) {
        self.is_running = false;
        self.modal = Some(Modal::CustomBreakComplete);
        self.notices
            .push(Notice::TimerFinished("Break is over".to_string()));
    }

    /// Transition on the server and follow the new phase
    async fn advance(&mut self) {
        match self.lifecycle.transition_state().await {
            Some(next) if next.status == SessionStatus::Completed => {
                self.session_countdown.stop();
                self.is_running = false;
                self.lifecycle.clear_active();
                self.selection.mark_completed(false);
                self.modal = Some(Modal::SessionComplete);
                self.notices
                    .push(Notice::Success("Session complete".to_string()));
            }
            Some(next) if next.status.is_active() => {
                self.start_countdown(&next);
                self.is_running = true;
            }
            Some(next) => {
                warn!(session_id = %next.id, "Session was cancelled on the server");
                self.session_countdown.stop();
                self.is_running = false;
                self.lifecycle.clear_active();
                self.restore_defaults();
            }
            None => {
                self.is_running = false;
                self.notices.push(Notice::Error(
                    "Could not advance the session, press Space to retry".to_string(),
                ));
            }
        }
    }

    // ---- helpers ----

    fn start_countdown(&mut self, session: &FocusSession) {
        let Some(end) = session.current_state_end_time else {
            warn!(session_id = %session.id, "Session has no end time");
            return;
        };
        let total = self.phase_length(session);
        self.session_countdown.start(end, total);
    }

    /// Full length of the session's current phase in seconds
    fn phase_length(&self, session: &FocusSession) -> u64 {
        let session_type = self.catalog.session_type(session.session_type_id);
        let secs = match (session.status, session_type) {
            (SessionStatus::Break, Some(st)) => st.break_duration,
            (SessionStatus::Break, None) => minutes_to_secs(self.settings.default_break_minutes),
            (_, Some(st)) => st.work_duration,
            (_, None) => session
                .custom_duration_seconds
                .unwrap_or(self.selection.default_work_secs()),
        };
        if secs > 0 {
            secs
        } else if session.status == SessionStatus::Break {
            DEFAULT_BREAK_SECS
        } else {
            self.selection.default_work_secs()
        }
    }

    fn restore_defaults(&mut self) {
        self.session_countdown.stop();
        self.is_running = false;
        self.selection.reset();
    }

    /// Whether the active session is in its final cycle
    pub fn is_final_cycle(&self) -> bool {
        self.lifecycle.active().is_some_and(|s| {
            is_final_cycle(s, self.catalog.session_type(s.session_type_id))
        })
    }

    #[cfg(test)]
    pub(crate) fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    #[cfg(test)]
    fn session_generation(&self) -> u64 {
        self.session_countdown.generation()
    }

    #[cfg(test)]
    fn ui_break_generation(&self) -> u64 {
        self.ui_break.generation()
    }
}

fn unwrap_list<T>(
    what: &str,
    result: Result<Vec<T>, crate::api::ApiError>,
    signed_out: &mut bool,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            if e.is_auth() {
                *signed_out = true;
            }
            warn!("Failed to load {}: {}", what, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{session_ending_in, Call, FakeApi};
    use crate::api::SessionLength;
    use crate::config::Config;
    use crate::focus_timing::countdown::{create_channel, TimerEventReceiver, MAX_PHASE_MINUTES};
    use crate::focus_timing::selection::Mode;

    fn controller() -> (FocusController<FakeApi>, FakeApi, TimerEventReceiver) {
        let api = FakeApi::new();
        let (tx, rx) = create_channel();
        let controller = FocusController::new(api.clone(), tx, ControllerSettings::default());
        (controller, api, rx)
    }

    fn session_type(cycles: u32) -> SessionType {
        SessionType {
            id: Uuid::new_v4(),
            name: "Classic".to_string(),
            work_duration: 1500,
            break_duration: 300,
            number_of_cycles: cycles,
        }
    }

    fn expire_session<A: SessionApi>(c: &FocusController<A>) -> TimerEvent {
        TimerEvent::Expired {
            source: CountdownSource::Session,
            generation: c.session_generation(),
        }
    }

    #[tokio::test]
    async fn test_start_creates_and_runs() {
        let (mut c, api, _rx) = controller();
        c.start().await;

        assert!(c.is_running());
        assert!(c.active_session().is_some());
        assert!(c.is_selection_frozen());
        assert!(matches!(api.calls()[0], Call::Create(_)));
    }

    #[tokio::test]
    async fn test_start_failure_leaves_selection_untouched() {
        let (mut c, api, _rx) = controller();
        c.apply_custom_duration(40).unwrap();
        api.set_fail(true);

        c.start().await;

        assert!(!c.is_running());
        assert!(c.active_session().is_none());
        assert_eq!(c.selection().mode(), Mode::Custom);
        assert_eq!(c.selection().length(), SessionLength::Custom(2400));
        assert!(c
            .take_notices()
            .iter()
            .any(|n| matches!(n, Notice::Error(_))));
    }

    #[tokio::test]
    async fn test_custom_expiry_completes_not_transitions() {
        let (mut c, api, _rx) = controller();
        c.apply_custom_duration(25).unwrap();
        c.start().await;
        let id = c.active_session().unwrap().id;

        c.handle_timer_event(expire_session(&c)).await;

        let calls = api.calls();
        assert!(calls.contains(&Call::UpdateStatus(id, SessionStatus::Completed)));
        assert!(!calls.iter().any(|call| matches!(call, Call::Transition(_))));
        assert_eq!(c.modal(), Some(Modal::CustomWorkComplete));
        assert_eq!(c.selection().mode(), Mode::CustomCompleted);
        assert!(c.active_session().is_none());
        assert!(c
            .take_notices()
            .iter()
            .any(|n| matches!(n, Notice::TimerFinished(_))));
    }

    #[tokio::test]
    async fn test_real_clock_expiry_reaches_zero_and_completes() {
        let api = FakeApi::new();
        let (tx, mut rx) = create_channel();
        let settings = ControllerSettings {
            tick_interval: Duration::from_millis(10),
            ..ControllerSettings::default()
        };
        let mut c = FocusController::new(api.clone(), tx, settings);

        // Adopt a custom session whose end time has already passed
        api.state.lock().unwrap().ongoing = Some(session_ending_in(SessionStatus::Working, -1));
        c.recover_ongoing().await;
        c.continue_ongoing();

        while c.modal().is_none() {
            let event = rx.recv().await.unwrap();
            c.handle_timer_event(event).await;
        }
        assert_eq!(c.display().format(), "25:00");
        assert_eq!(c.modal(), Some(Modal::CustomWorkComplete));
        assert!(api
            .calls()
            .iter()
            .any(|call| matches!(call, Call::UpdateStatus(_, SessionStatus::Completed))));
    }

    #[tokio::test]
    async fn test_work_to_break_transitions() {
        let (mut c, api, _rx) = controller();
        let st = session_type(4);
        c.catalog_mut().session_types.push(st.clone());
        c.select_session_type(0).unwrap();
        c.start().await;

        c.handle_timer_event(expire_session(&c)).await;

        assert!(api.calls().iter().any(|call| matches!(call, Call::Transition(_))));
        assert_eq!(c.phase(), Phase::Break);
        assert!(c.is_running());
        assert_eq!(c.modal(), None);
    }

    #[tokio::test]
    async fn test_last_cycle_work_prompts() {
        let (mut c, api, _rx) = controller();
        let st = session_type(1);
        c.catalog_mut().session_types.push(st);
        c.select_session_type(0).unwrap();
        c.start().await;

        c.handle_timer_event(expire_session(&c)).await;
        assert_eq!(c.modal(), Some(Modal::LastCycleWorkComplete));
        assert!(!api.calls().iter().any(|call| matches!(call, Call::Transition(_))));

        c.finish_session().await;
        assert_eq!(c.modal(), Some(Modal::SessionComplete));
        assert_eq!(c.selection().mode(), Mode::SessionCompleted);
        assert_eq!(c.display().format(), "25:00");

        c.acknowledge();
        assert_eq!(c.modal(), None);
    }

    #[tokio::test]
    async fn test_last_break_completes_session() {
        let (mut c, api, _rx) = controller();
        let st = session_type(1);
        c.catalog_mut().session_types.push(st);
        c.select_session_type(0).unwrap();
        c.start().await;
        c.handle_timer_event(expire_session(&c)).await;

        let mut last_break = session_ending_in(SessionStatus::Break, 300);
        last_break.session_type_id = c.selection().session_type_id();
        api.state.lock().unwrap().next_transition = Some(last_break);
        c.take_last_break().await;
        assert_eq!(c.phase(), Phase::Break);

        let mut done = session_ending_in(SessionStatus::Completed, 0);
        done.current_state_end_time = None;
        api.state.lock().unwrap().next_transition = Some(done);
        c.handle_timer_event(expire_session(&c)).await;

        assert_eq!(c.modal(), Some(Modal::SessionComplete));
        assert!(c.active_session().is_none());
        assert!(!c.is_running());
    }

    fn transition_to(api: &FakeApi, status: SessionStatus, type_id: Option<Uuid>, cycles: u32) {
        let mut next = session_ending_in(status, 300);
        next.session_type_id = type_id;
        next.custom_duration_seconds = None;
        next.completed_cycles = cycles;
        api.state.lock().unwrap().next_transition = Some(next);
    }

    fn transition_count(api: &FakeApi) -> usize {
        api.calls()
            .iter()
            .filter(|call| matches!(call, Call::Transition(_)))
            .count()
    }

    #[tokio::test]
    async fn test_break_to_work_restarts_countdown() {
        let (mut c, api, _rx) = controller();
        c.catalog_mut().session_types.push(session_type(4));
        c.select_session_type(0).unwrap();
        c.start().await;
        let type_id = c.selection().session_type_id();

        transition_to(&api, SessionStatus::Break, type_id, 0);
        c.handle_timer_event(expire_session(&c)).await;
        assert_eq!(c.phase(), Phase::Break);

        transition_to(&api, SessionStatus::Working, type_id, 1);
        let before = c.session_generation();
        c.handle_timer_event(expire_session(&c)).await;

        assert_eq!(transition_count(&api), 2);
        assert_eq!(c.phase(), Phase::Work);
        assert!(c.is_running());
        assert_eq!(c.modal(), None);
        assert!(c.session_generation() > before);
        assert_eq!(c.cycle_position(), Some((2, 4)));
        assert_eq!(c.selection().mode(), Mode::SessionType);
    }

    #[tokio::test]
    async fn test_last_break_continues_when_server_keeps_going() {
        let (mut c, api, _rx) = controller();
        c.catalog_mut().session_types.push(session_type(2));
        c.select_session_type(0).unwrap();
        c.start().await;
        let type_id = c.selection().session_type_id();

        // Work of cycle 1 ends, break of the final cycle begins
        transition_to(&api, SessionStatus::Break, type_id, 1);
        c.handle_timer_event(expire_session(&c)).await;
        assert!(c.is_final_cycle());

        // Server answers the final break with another work phase
        transition_to(&api, SessionStatus::Working, type_id, 1);
        c.handle_timer_event(expire_session(&c)).await;

        assert_eq!(transition_count(&api), 2);
        assert_eq!(c.modal(), None);
        assert_eq!(c.phase(), Phase::Work);
        assert!(c.is_running());
        assert!(c.active_session().is_some());
        assert_eq!(c.selection().mode(), Mode::SessionType);
    }

    #[tokio::test]
    async fn test_configured_work_length_shown_and_sent() {
        let config: Config = toml::from_str("default_work_minutes = 50").unwrap();
        let api = FakeApi::new();
        let (tx, _rx) = create_channel();
        let mut c = FocusController::new(api.clone(), tx, config.controller_settings());

        assert_eq!(c.display().format(), "50:00");

        c.start().await;
        match &api.calls()[0] {
            Call::Create(request) => assert_eq!(request.length, SessionLength::Custom(3000)),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_huge_break_preset_is_capped() {
        let config: Config =
            toml::from_str("break_presets_minutes = [200000000000000]").unwrap();
        let api = FakeApi::new();
        let (tx, _rx) = create_channel();
        let mut c = FocusController::new(api, tx, config.controller_settings());
        c.apply_custom_duration(25).unwrap();
        c.start().await;
        c.handle_timer_event(expire_session(&c)).await;
        assert_eq!(c.modal(), Some(Modal::CustomWorkComplete));

        c.take_ui_break(0);

        assert!(c.is_ui_break_active());
        assert!(c.is_running());
        assert_eq!(c.display().remaining_secs(), MAX_PHASE_MINUTES * 60);
    }

    #[tokio::test]
    async fn test_reset_during_ui_break() {
        let (mut c, api, _rx) = controller();
        c.start().await;
        c.handle_timer_event(expire_session(&c)).await;
        c.take_ui_break(1);
        assert!(c.is_ui_break_active());
        assert_eq!(c.display().format(), "10:00");
        let calls_before = api.calls().len();

        c.request_reset();
        assert_eq!(c.modal(), Some(Modal::ConfirmReset(ResetVariant::UiBreak)));

        c.confirm_reset().await;
        assert!(!c.is_ui_break_active());
        assert!(!c.is_running());
        assert_eq!(c.selection().mode(), Mode::Idle);
        assert_eq!(c.display().format(), "25:00");
        assert_eq!(api.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_ui_break_expiry() {
        let (mut c, _api, _rx) = controller();
        c.start().await;
        c.handle_timer_event(expire_session(&c)).await;
        c.take_ui_break(0);

        let event = TimerEvent::Expired {
            source: CountdownSource::UiBreak,
            generation: c.ui_break_generation(),
        };
        c.handle_timer_event(event).await;
        assert_eq!(c.modal(), Some(Modal::CustomBreakComplete));

        c.acknowledge();
        assert_eq!(c.modal(), None);
        assert!(!c.is_ui_break_active());
    }

    #[tokio::test]
    async fn test_reset_session_cancels_on_server() {
        let (mut c, api, _rx) = controller();
        c.start().await;
        let id = c.active_session().unwrap().id;

        c.request_reset();
        assert_eq!(c.modal(), Some(Modal::ConfirmReset(ResetVariant::Session)));
        c.confirm_reset().await;

        assert!(api
            .calls()
            .contains(&Call::UpdateStatus(id, SessionStatus::Cancelled)));
        assert!(c.active_session().is_none());
        assert!(!c.is_running());
    }

    #[tokio::test]
    async fn test_failed_cancel_keeps_session() {
        let (mut c, api, _rx) = controller();
        c.start().await;
        api.set_fail(true);

        c.request_reset();
        c.confirm_reset().await;

        assert!(c.active_session().is_some());
        assert!(c.is_running());
    }

    #[tokio::test]
    async fn test_selection_frozen_while_active() {
        let (mut c, _api, _rx) = controller();
        c.catalog_mut().tags.push(Tag {
            id: Uuid::new_v4(),
            name: "deep".to_string(),
            color: String::new(),
        });
        c.catalog_mut().session_types.push(session_type(4));
        c.start().await;

        assert_eq!(c.toggle_tag(0), Err(SelectionError::Frozen));
        assert_eq!(c.select_session_type(0), Err(SelectionError::Frozen));
        assert!(c.selection().tags().is_empty());
        assert_eq!(c.selection().session_type_id(), None);
    }

    #[tokio::test]
    async fn test_ongoing_blocks_start_until_resolved() {
        let (mut c, api, _rx) = controller();
        let existing = session_ending_in(SessionStatus::Working, 600);
        api.state.lock().unwrap().ongoing = Some(existing.clone());

        c.recover_ongoing().await;
        assert_eq!(c.modal(), Some(Modal::RecoverOngoing));

        // Start is ignored while the prompt is open
        c.start().await;
        assert!(!api.calls().iter().any(|call| matches!(call, Call::Create(_))));

        c.discard_ongoing().await;
        assert_eq!(c.modal(), None);
        assert!(api
            .calls()
            .contains(&Call::UpdateStatus(existing.id, SessionStatus::Cancelled)));

        c.start().await;
        assert!(c.is_running());
    }

    #[tokio::test]
    async fn test_continue_ongoing_adopts_session() {
        let (mut c, api, _rx) = controller();
        let existing = session_ending_in(SessionStatus::Working, 600);
        api.state.lock().unwrap().ongoing = Some(existing.clone());

        c.recover_ongoing().await;
        c.continue_ongoing();

        assert_eq!(c.active_session().map(|s| s.id), Some(existing.id));
        assert!(c.is_running());
        assert_eq!(c.selection().mode(), Mode::Custom);
        assert_eq!(c.phase(), Phase::Work);
    }

    #[tokio::test]
    async fn test_stale_expiry_ignored() {
        let (mut c, api, _rx) = controller();
        c.start().await;
        let stale = TimerEvent::Expired {
            source: CountdownSource::Session,
            generation: c.session_generation() + 5,
        };
        c.handle_timer_event(stale).await;

        assert_eq!(c.modal(), None);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_duration_dialog() {
        let (mut c, _api, _rx) = controller();
        c.open_custom_duration();
        assert_eq!(c.modal(), Some(Modal::CustomDuration));

        c.apply_custom_duration(50).unwrap();
        assert_eq!(c.modal(), None);
        assert_eq!(c.display().format(), "50:00");

        c.open_custom_duration();
        c.cancel_modal();
        assert_eq!(c.modal(), None);
    }

    #[tokio::test]
    async fn test_cycle_position() {
        let (mut c, _api, _rx) = controller();
        c.catalog_mut().session_types.push(session_type(3));
        c.select_session_type(0).unwrap();
        c.start().await;
        assert_eq!(c.cycle_position(), Some((1, 3)));
        assert!(!c.is_final_cycle());
    }
}
