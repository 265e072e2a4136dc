//! Focusable lists and side panels
//!
//! There is a single screen; these describe which list receives the
//! navigation keys and which side panels are open.

/// List that receives j/k and Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFocus {
    #[default]
    SessionTypes,
    Tags,
    /// Only reachable while the tasks panel is open
    Plans,
}

impl ListFocus {
    /// Next list in Tab order
    pub fn next(self, tasks_open: bool) -> Self {
        match self {
            ListFocus::SessionTypes => ListFocus::Tags,
            ListFocus::Tags if tasks_open => ListFocus::Plans,
            ListFocus::Tags | ListFocus::Plans => ListFocus::SessionTypes,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ListFocus::SessionTypes => "Session types",
            ListFocus::Tags => "Tags",
            ListFocus::Plans => "Tasks",
        }
    }
}

/// Toggleable side panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Badges,
    Tasks,
    Messages,
}

impl Panel {
    pub fn title(&self) -> &'static str {
        match self {
            Panel::Badges => "Badges",
            Panel::Tasks => "Tasks",
            Panel::Messages => "Messages",
        }
    }
}

/// Which side panels are open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Panels {
    pub badges: bool,
    pub tasks: bool,
    pub messages: bool,
}

impl Panels {
    pub fn is_open(&self, panel: Panel) -> bool {
        match panel {
            Panel::Badges => self.badges,
            Panel::Tasks => self.tasks,
            Panel::Messages => self.messages,
        }
    }

    /// Flip a panel; returns whether it is now open
    pub fn toggle(&mut self, panel: Panel) -> bool {
        let flag = match panel {
            Panel::Badges => &mut self.badges,
            Panel::Tasks => &mut self.tasks,
            Panel::Messages => &mut self.messages,
        };
        *flag = !*flag;
        *flag
    }

    /// Open panels in display order
    pub fn open(&self) -> Vec<Panel> {
        [Panel::Tasks, Panel::Badges, Panel::Messages]
            .into_iter()
            .filter(|p| self.is_open(*p))
            .collect()
    }

    pub fn any_open(&self) -> bool {
        self.badges || self.tasks || self.messages
    }
}
