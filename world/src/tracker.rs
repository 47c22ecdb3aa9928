//! Game counters and terminal-condition evaluation.

use flash_point_core::{Counters, Rules, Terminal};

/// Tracks damage, victims and the verdict that ends the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Tracker {
    rules: Rules,
    counters: Counters,
    terminal: Option<Terminal>,
}

impl Tracker {
    /// Creates a tracker for a board holding `total_victims` victims.
    pub(crate) fn new(rules: Rules, total_victims: u32) -> Self {
        Self {
            rules,
            counters: Counters {
                total_victims,
                ..Counters::default()
            },
            terminal: None,
        }
    }

    pub(crate) fn rules(&self) -> Rules {
        self.rules
    }

    pub(crate) fn counters(&self) -> Counters {
        self.counters
    }

    pub(crate) fn terminal(&self) -> Option<Terminal> {
        self.terminal
    }

    pub(crate) fn running(&self) -> bool {
        self.terminal.is_none()
    }

    /// Places one damage marker, saturating at the collapse threshold.
    pub(crate) fn add_damage(&mut self) -> u32 {
        let next = self.counters.damage_markers.saturating_add(1);
        self.counters.damage_markers = next.min(self.rules.collapse_threshold);
        self.counters.damage_markers
    }

    pub(crate) fn record_loss(&mut self) {
        self.counters.lost_victims = self.counters.lost_victims.saturating_add(1);
    }

    pub(crate) fn record_rescue(&mut self) {
        self.counters.rescued_victims = self.counters.rescued_victims.saturating_add(1);
    }

    /// Evaluates the terminal guards in order; the first one that holds wins.
    pub(crate) fn check_terminal(&self) -> Option<Terminal> {
        let counters = self.counters;
        if counters.damage_markers >= self.rules.collapse_threshold {
            Some(Terminal::Collapse)
        } else if counters.lost_victims >= self.rules.max_lost_victims {
            Some(Terminal::TooManyLost)
        } else if counters.rescued_victims >= self.rules.victory.target(counters.total_victims) {
            Some(Terminal::Victory)
        } else {
            None
        }
    }

    /// Latches the first verdict reached. Returns it only when it is new.
    pub(crate) fn latch(&mut self) -> Option<Terminal> {
        if self.terminal.is_some() {
            return None;
        }
        self.terminal = self.check_terminal();
        self.terminal
    }
}
