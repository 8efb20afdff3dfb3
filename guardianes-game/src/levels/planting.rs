//! Level 2: fertilize the field and plant muña.
use serde::{Deserialize, Serialize};

use super::{LevelSimulator, LevelStatus, Notice};
use crate::data::PlantingConfig;
use crate::meter::MeterSnapshot;
use crate::numbers::ratio_pct;
use crate::score::{CompletionEvent, LevelNumber, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Patch {
    #[default]
    Empty,
    Fertilized,
    Planted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantingAction {
    Fertilize(usize),
    Plant(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantingSim {
    patches: Vec<Patch>,
    fertilizer: u8,
    initial_fertilizer: u8,
    target: u8,
    planted: u8,
    status: LevelStatus,
}

impl PlantingSim {
    #[must_use]
    pub fn new(config: PlantingConfig) -> Self {
        Self {
            patches: vec![Patch::Empty; config.patches],
            fertilizer: config.fertilizer,
            initial_fertilizer: config.fertilizer,
            target: config.target,
            planted: 0,
            status: LevelStatus::Playing,
        }
    }

    #[must_use]
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    #[must_use]
    pub const fn fertilizer(&self) -> u8 {
        self.fertilizer
    }

    #[must_use]
    pub const fn planted(&self) -> u8 {
        self.planted
    }

    #[must_use]
    pub const fn target(&self) -> u8 {
        self.target
    }

    /// No fertilizer left, nothing left to plant, and still short of target.
    ///
    /// Purely informational: a stalled field stays `Playing`.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        self.status == LevelStatus::Playing
            && self.fertilizer == 0
            && !self.patches.contains(&Patch::Fertilized)
            && self.planted < self.target
    }

    fn score(&self) -> Score {
        let spent = self.initial_fertilizer.saturating_sub(self.fertilizer).max(1);
        Score::saturating(u32::from(ratio_pct(
            u32::from(self.planted),
            u32::from(spent),
        )))
    }

    fn fertilize(&mut self, index: usize) -> Notice {
        let Some(patch) = self.patches.get_mut(index) else {
            return Notice::NoSuchTarget { index };
        };
        if *patch != Patch::Empty {
            return Notice::AlreadyFertilized { index };
        }
        if self.fertilizer == 0 {
            return Notice::OutOfFertilizer;
        }
        *patch = Patch::Fertilized;
        self.fertilizer -= 1;
        Notice::PatchFertilized {
            remaining_fertilizer: self.fertilizer,
        }
    }

    fn plant(&mut self, index: usize) -> Vec<Notice> {
        let Some(patch) = self.patches.get_mut(index) else {
            return vec![Notice::NoSuchTarget { index }];
        };
        match *patch {
            Patch::Empty => vec![Notice::NeedsFertilizer { index }],
            Patch::Planted => vec![Notice::AlreadyPlanted { index }],
            Patch::Fertilized => {
                *patch = Patch::Planted;
                self.planted = self.planted.saturating_add(1);
                let mut notices = vec![Notice::MunaPlanted {
                    planted: self.planted,
                }];
                if self.planted >= self.target {
                    self.status = LevelStatus::Won;
                    notices.push(Notice::FieldComplete);
                }
                notices
            }
        }
    }
}

impl LevelSimulator for PlantingSim {
    type Action = PlantingAction;

    fn number(&self) -> LevelNumber {
        LevelNumber::PLANTING
    }

    fn status(&self) -> LevelStatus {
        self.status
    }

    fn apply_action(&mut self, action: PlantingAction) -> Vec<Notice> {
        if self.status.is_terminal() {
            return vec![Notice::LevelOver];
        }
        match action {
            PlantingAction::Fertilize(index) => vec![self.fertilize(index)],
            PlantingAction::Plant(index) => self.plant(index),
        }
    }

    fn advance_turn(&mut self) -> Vec<Notice> {
        if self.status.is_terminal() {
            return vec![Notice::LevelOver];
        }
        Vec::new()
    }

    fn completion(&self) -> Option<CompletionEvent> {
        (self.status == LevelStatus::Won).then(|| CompletionEvent::new(self.number(), self.score()))
    }

    fn meters(&self) -> MeterSnapshot {
        Vec::new()
    }
}
