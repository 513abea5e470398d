use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tab {
    #[default]
    Clock,
    Stopwatch,
    Timer,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Clock, Tab::Stopwatch, Tab::Timer];

    pub fn name(self) -> &'static str {
        match self {
            Tab::Clock => "clock",
            Tab::Stopwatch => "stopwatch",
            Tab::Timer => "timer",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Clock => "Clock",
            Tab::Stopwatch => "Stopwatch",
            Tab::Timer => "Timer",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownTab(pub String);

impl fmt::Display for UnknownTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tab '{}' (expected clock, stopwatch or timer)", self.0)
    }
}

impl std::error::Error for UnknownTab {}

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTab(s.to_string()))
    }
}

/// Which panel is active. Exactly one tab is active at any time.
#[derive(Clone, Debug, Default)]
pub struct TabSelector {
    active: Tab,
}

impl TabSelector {
    pub fn new(active: Tab) -> Self {
        Self { active }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn select(&mut self, tab: Tab) {
        self.active = tab;
    }

    /// Switch by name. Unknown names leave the selection unchanged and
    /// return false.
    pub fn switch_tab(&mut self, name: &str) -> bool {
        match name.parse() {
            Ok(tab) => {
                self.active = tab;
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }

    /// The clock face is always shown; the stopwatch and timer panels only
    /// while their tab is active.
    pub fn panel_visible(&self, tab: Tab) -> bool {
        tab == Tab::Clock || self.active == tab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_tab() {
        let mut tabs = TabSelector::default();
        assert_eq!(tabs.active(), Tab::Clock);

        assert!(tabs.switch_tab("stopwatch"));
        assert!(tabs.is_active(Tab::Stopwatch));
        assert_eq!(Tab::ALL.iter().filter(|t| tabs.is_active(**t)).count(), 1);

        assert!(tabs.switch_tab("Timer"));
        assert_eq!(tabs.active(), Tab::Timer);
    }

    #[test]
    fn test_unknown_tab_is_noop() {
        let mut tabs = TabSelector::new(Tab::Stopwatch);
        assert!(!tabs.switch_tab("alarm"));
        assert!(!tabs.switch_tab(""));
        assert_eq!(tabs.active(), Tab::Stopwatch);
    }

    #[test]
    fn test_panel_visibility() {
        let mut tabs = TabSelector::default();
        assert!(tabs.panel_visible(Tab::Clock));
        assert!(!tabs.panel_visible(Tab::Stopwatch));
        assert!(!tabs.panel_visible(Tab::Timer));

        tabs.select(Tab::Timer);
        assert!(tabs.panel_visible(Tab::Clock));
        assert!(!tabs.panel_visible(Tab::Stopwatch));
        assert!(tabs.panel_visible(Tab::Timer));
    }

    #[test]
    fn test_cycle() {
        assert_eq!(Tab::Clock.next(), Tab::Stopwatch);
        assert_eq!(Tab::Timer.next(), Tab::Clock);
        assert_eq!(Tab::Clock.prev(), Tab::Timer);
        assert_eq!(Tab::Stopwatch.prev(), Tab::Clock);
    }

    #[test]
    fn test_parse() {
        assert_eq!("clock".parse::<Tab>(), Ok(Tab::Clock));
        assert_eq!(" TIMER ".parse::<Tab>(), Ok(Tab::Timer));
        assert_eq!("x".parse::<Tab>(), Err(UnknownTab("x".to_string())));
    }
}
