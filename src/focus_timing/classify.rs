//! What a finished session countdown means

use crate::api::{FocusSession, SessionStatus, SessionType};

/// Kind of phase end, decided once when the session countdown hits zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Custom-duration work finished; complete it and offer a local break
    CustomWorkComplete,
    /// Work of the final cycle finished; ask for one more break or finish
    LastCycleWorkToBreak,
    /// Work finished; advance to the break
    WorkToBreak,
    /// Break of the final cycle finished; advance, expecting completion
    LastCycleBreakComplete,
    /// Break finished; advance to the next work phase
    BreakToWork,
}

/// Whether the session is in its final cycle
///
/// Unknown session types never count as final; the server then decides via
/// the transition response.
pub fn is_final_cycle(session: &FocusSession, session_type: Option<&SessionType>) -> bool {
    match session_type {
        Some(st) => session.completed_cycles >= st.number_of_cycles.saturating_sub(1),
        None => false,
    }
}

/// Classify an expired phase
///
/// Custom sessions never have cycles, so the custom check comes first and
/// ignores `completed_cycles`. Terminal sessions yield `None`.
pub fn classify(session: &FocusSession, session_type: Option<&SessionType>) -> Option<Completion> {
    let final_cycle = is_final_cycle(session, session_type);

    match session.status {
        SessionStatus::Working if session.is_custom() => Some(Completion::CustomWorkComplete),
        SessionStatus::Working if final_cycle => Some(Completion::LastCycleWorkToBreak),
        SessionStatus::Working => Some(Completion::WorkToBreak),
        SessionStatus::Break if final_cycle => Some(Completion::LastCycleBreakComplete),
        SessionStatus::Break => Some(Completion::BreakToWork),
        SessionStatus::Completed | SessionStatus::Cancelled => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session_type(cycles: u32) -> SessionType {
        SessionType {
            id: Uuid::new_v4(),
            name: "Classic".to_string(),
            work_duration: 1500,
            break_duration: 300,
            number_of_cycles: cycles,
        }
    }

    fn session(status: SessionStatus, completed: u32, st: Option<&SessionType>) -> FocusSession {
        FocusSession {
            id: Uuid::new_v4(),
            status,
            current_state_end_time: None,
            completed_cycles: completed,
            session_type_id: st.map(|s| s.id),
            custom_duration_seconds: if st.is_none() { Some(1500) } else { None },
            tags: vec![],
            to_do_item_id: None,
        }
    }

    #[test]
    fn test_last_cycle_work() {
        let st = session_type(3);
        let s = session(SessionStatus::Working, 2, Some(&st));
        assert_eq!(
            classify(&s, Some(&st)),
            Some(Completion::LastCycleWorkToBreak)
        );
    }

    #[test]
    fn test_ordinary_work() {
        let st = session_type(3);
        let s = session(SessionStatus::Working, 1, Some(&st));
        assert_eq!(classify(&s, Some(&st)), Some(Completion::WorkToBreak));
    }

    #[test]
    fn test_custom_ignores_cycles() {
        for completed in [0, 1, 7] {
            let s = session(SessionStatus::Working, completed, None);
            assert_eq!(classify(&s, None), Some(Completion::CustomWorkComplete));
        }
    }

    #[test]
    fn test_breaks() {
        let st = session_type(4);
        let last = session(SessionStatus::Break, 3, Some(&st));
        assert_eq!(
            classify(&last, Some(&st)),
            Some(Completion::LastCycleBreakComplete)
        );

        let mid = session(SessionStatus::Break, 1, Some(&st));
        assert_eq!(classify(&mid, Some(&st)), Some(Completion::BreakToWork));
    }

    #[test]
    fn test_single_cycle_type_is_always_final() {
        let st = session_type(1);
        let s = session(SessionStatus::Working, 0, Some(&st));
        assert_eq!(
            classify(&s, Some(&st)),
            Some(Completion::LastCycleWorkToBreak)
        );

        let zero = session_type(0);
        assert!(is_final_cycle(&s, Some(&zero)));
    }

    #[test]
    fn test_unknown_type_not_final() {
        let st = session_type(2);
        let s = session(SessionStatus::Working, 5, Some(&st));
        assert_eq!(classify(&s, None), Some(Completion::WorkToBreak));
    }

    #[test]
    fn test_terminal_status() {
        let s = session(SessionStatus::Completed, 0, None);
        assert_eq!(classify(&s, None), None);
        let s = session(SessionStatus::Cancelled, 0, None);
        assert_eq!(classify(&s, None), None);
    }
}
