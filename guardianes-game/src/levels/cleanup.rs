//! Level 1: clear the contaminants out of the stream.
use serde::{Deserialize, Serialize};

use super::{LevelSimulator, LevelStatus, Notice};
use crate::data::CleanupConfig;
use crate::meter::{Meter, MeterKind, MeterSnapshot};
use crate::numbers::ratio_pct;
use crate::score::{CompletionEvent, LevelNumber, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupAction {
    /// Pull contaminant `index` out of the water.
    Remove(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Contaminant {
    kind: String,
    removed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupSim {
    contaminants: Vec<Contaminant>,
    cleaned: u8,
    health: Meter,
    score: Score,
    status: LevelStatus,
}

impl CleanupSim {
    #[must_use]
    pub fn new(config: &CleanupConfig) -> Self {
        Self {
            contaminants: config
                .contaminants
                .iter()
                .map(|kind| Contaminant {
                    kind: kind.clone(),
                    removed: false,
                })
                .collect(),
            cleaned: 0,
            health: Meter::EMPTY,
            score: Score::saturating(u32::from(config.score)),
            status: LevelStatus::Playing,
        }
    }

    #[must_use]
    pub const fn cleaned(&self) -> u8 {
        self.cleaned
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.contaminants.len()
    }

    /// Contaminants still in the water, by index and kind.
    pub fn remaining(&self) -> impl Iterator<Item = (usize, &str)> {
        self.contaminants
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.removed)
            .map(|(idx, c)| (idx, c.kind.as_str()))
    }

    fn total_u32(&self) -> u32 {
        u32::try_from(self.contaminants.len()).unwrap_or(u32::MAX)
    }
}

impl LevelSimulator for CleanupSim {
    type Action = CleanupAction;

    fn number(&self) -> LevelNumber {
        LevelNumber::CLEANUP
    }

    fn status(&self) -> LevelStatus {
        self.status
    }

    fn apply_action(&mut self, action: CleanupAction) -> Vec<Notice> {
        if self.status.is_terminal() {
            return vec![Notice::LevelOver];
        }
        let CleanupAction::Remove(index) = action;
        let Some(contaminant) = self.contaminants.get_mut(index) else {
            return vec![Notice::NoSuchTarget { index }];
        };
        if contaminant.removed {
            return vec![Notice::AlreadyCleaned { index }];
        }
        contaminant.removed = true;
        self.cleaned = self.cleaned.saturating_add(1);
        self.health = Meter::from(ratio_pct(u32::from(self.cleaned), self.total_u32()));

        let remaining = self.total_u32().saturating_sub(u32::from(self.cleaned));
        let mut notices = vec![Notice::ContaminantRemoved {
            remaining: u8::try_from(remaining).unwrap_or(u8::MAX),
        }];
        if remaining == 0 {
            self.status = LevelStatus::Won;
            notices.push(Notice::StreamRestored);
        }
        notices
    }

    fn advance_turn(&mut self) -> Vec<Notice> {
        if self.status.is_terminal() {
            return vec![Notice::LevelOver];
        }
        Vec::new()
    }

    fn completion(&self) -> Option<CompletionEvent> {
        (self.status == LevelStatus::Won).then(|| CompletionEvent::new(self.number(), self.score))
    }

    fn meters(&self) -> MeterSnapshot {
        vec![(MeterKind::Health, self.health)]
    }
}
