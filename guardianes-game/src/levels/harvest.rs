//! Level 4: a week of kculli maize care followed by a timed harvest.
//!
//! Watering and fertilizing have cooldowns measured in days; acting too soon
//! costs health. On the final day a healthy plant opens the harvest phase, a
//! countdown driven by the level's own [`Scheduler`]. The session forwards
//! elapsed time through [`LevelSimulator::tick`].
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{LevelSimulator, LevelStatus, Notice};
use crate::constants::{
    HARVEST_DARK_PENALTY, HARVEST_DRY_PENALTY, HARVEST_DRY_THRESHOLD, HARVEST_FACT_DAY,
    HARVEST_FERTILIZE_COOLDOWN_DAYS, HARVEST_FERTILIZE_PENALTY, HARVEST_FERTILIZE_REWARD,
    HARVEST_HEAT_WATER_LOSS, HARVEST_HUNGRY_PENALTY, HARVEST_HUNGRY_THRESHOLD,
    HARVEST_LARGE_EVERY, HARVEST_LARGE_POINTS, HARVEST_NUTRIENT_DECAY, HARVEST_NUTRIENT_GAIN,
    HARVEST_PLAGUE_NUTRIENT_FLOOR, HARVEST_PLAGUE_PENALTY, HARVEST_RAIN_WATER,
    HARVEST_SMALL_POINTS, HARVEST_SUN_DECAY, HARVEST_SUN_FLOOR, HARVEST_WATER_COOLDOWN_DAYS,
    HARVEST_WATER_DECAY, HARVEST_WATER_GAIN, HARVEST_WATER_PENALTY, HARVEST_WATER_REWARD,
};
use crate::data::{HarvestConfig, SpecialEventKind};
use crate::meter::{Meter, MeterKind, MeterSnapshot};
use crate::numbers::mean_pct;
use crate::rng::RandomSource;
use crate::scheduler::{Scheduler, TimerId};
use crate::score::{CompletionEvent, LevelNumber, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestAction {
    Water,
    Fertilize,
    /// Click ear `index` during the harvest phase. Every click scores.
    Harvest(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestPhase {
    #[default]
    Growing,
    Harvesting,
    Finished,
}

#[derive(Debug)]
pub struct HarvestSim {
    config: HarvestConfig,
    water: Meter,
    sun: Meter,
    nutrients: Meter,
    health: Meter,
    harvest: Meter,
    day: u32,
    last_watered: u32,
    last_fertilized: u32,
    phase: HarvestPhase,
    time_left: u32,
    countdown: Option<TimerId>,
    scheduler: Scheduler,
    status: LevelStatus,
    rng: Box<dyn RandomSource>,
}

impl HarvestSim {
    #[must_use]
    pub fn new(config: HarvestConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            water: Meter::from(config.start.water),
            sun: Meter::from(config.start.sun),
            nutrients: Meter::from(config.start.nutrients),
            health: Meter::from(config.start.health),
            harvest: Meter::EMPTY,
            day: 1,
            last_watered: 0,
            last_fertilized: 0,
            phase: HarvestPhase::Growing,
            time_left: config.countdown_secs,
            countdown: None,
            scheduler: Scheduler::new(),
            status: LevelStatus::Playing,
            config,
            rng,
        }
    }

    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    #[must_use]
    pub const fn phase(&self) -> HarvestPhase {
        self.phase
    }

    #[must_use]
    pub const fn health(&self) -> Meter {
        self.health
    }

    #[must_use]
    pub const fn harvest_score(&self) -> Meter {
        self.harvest
    }

    /// Seconds left on the harvest countdown.
    #[must_use]
    pub const fn time_left(&self) -> u32 {
        self.time_left
    }

    #[must_use]
    pub fn ears(&self) -> usize {
        self.config.ears
    }

    /// True when watering today would not be penalized.
    #[must_use]
    pub const fn can_water(&self) -> bool {
        self.day.saturating_sub(self.last_watered) >= HARVEST_WATER_COOLDOWN_DAYS
    }

    /// True when fertilizing today would not be penalized.
    #[must_use]
    pub const fn can_fertilize(&self) -> bool {
        self.day.saturating_sub(self.last_fertilized) >= HARVEST_FERTILIZE_COOLDOWN_DAYS
    }

    /// Whether the countdown timer is still scheduled.
    #[must_use]
    pub fn countdown_pending(&self) -> bool {
        self.countdown
            .is_some_and(|id| self.scheduler.is_pending(id))
    }

    fn water(&mut self) -> Notice {
        if self.can_water() {
            self.water.adjust(HARVEST_WATER_GAIN);
            self.last_watered = self.day;
            self.health.adjust(HARVEST_WATER_REWARD);
            Notice::WateredWell
        } else {
            self.health.adjust(-HARVEST_WATER_PENALTY);
            Notice::Overwatered
        }
    }

    fn fertilize(&mut self) -> Notice {
        if self.can_fertilize() {
            self.nutrients.adjust(HARVEST_NUTRIENT_GAIN);
            self.last_fertilized = self.day;
            self.health.adjust(HARVEST_FERTILIZE_REWARD);
            Notice::FertilizedWell
        } else {
            self.health.adjust(-HARVEST_FERTILIZE_PENALTY);
            Notice::Overfertilized
        }
    }

    fn pick(&mut self, index: usize) -> Notice {
        if index >= self.config.ears {
            return Notice::NoSuchTarget { index };
        }
        let points = if index % HARVEST_LARGE_EVERY == 0 {
            HARVEST_LARGE_POINTS
        } else {
            HARVEST_SMALL_POINTS
        };
        self.harvest.adjust(points);
        Notice::EarHarvested {
            points: u8::try_from(points).unwrap_or(0),
            total: self.harvest.value(),
        }
    }

    fn apply_event(&mut self, event: SpecialEventKind) {
        match event {
            SpecialEventKind::Rain => {
                self.water.adjust(HARVEST_RAIN_WATER);
                self.last_watered = self.day;
            }
            SpecialEventKind::Plague => {
                if self.nutrients.value() < HARVEST_PLAGUE_NUTRIENT_FLOOR {
                    self.health.adjust(-HARVEST_PLAGUE_PENALTY);
                }
            }
            SpecialEventKind::Heat => self.water.adjust(-HARVEST_HEAT_WATER_LOSS),
        }
    }

    fn start_harvest(&mut self) -> Notice {
        self.phase = HarvestPhase::Harvesting;
        self.time_left = self.config.countdown_secs;
        self.countdown = Some(self.scheduler.schedule_every(Duration::from_secs(1)));
        Notice::HarvestStarted {
            seconds: self.time_left,
        }
    }

    fn finish_harvest(&mut self) -> Notice {
        if let Some(id) = self.countdown.take() {
            self.scheduler.cancel(id);
        }
        self.phase = HarvestPhase::Finished;
        self.status = LevelStatus::Won;
        Notice::HarvestComplete {
            harvest_score: self.harvest.value(),
        }
    }

    fn final_score(&self) -> Score {
        Score::saturating(u32::from(mean_pct(
            u32::from(self.health.value()),
            u32::from(self.harvest.value()),
        )))
    }
}

impl LevelSimulator for HarvestSim {
    type Action = HarvestAction;

    fn number(&self) -> LevelNumber {
        LevelNumber::HARVEST
    }

    fn status(&self) -> LevelStatus {
        self.status
    }

    fn apply_action(&mut self, action: HarvestAction) -> Vec<Notice> {
        if self.status.is_terminal() {
            return vec![Notice::LevelOver];
        }
        let notice = match (self.phase, action) {
            (HarvestPhase::Harvesting, HarvestAction::Harvest(index)) => self.pick(index),
            (HarvestPhase::Harvesting, _) => Notice::NotDuringHarvest,
            (_, HarvestAction::Harvest(_)) => Notice::HarvestNotReady,
            (_, HarvestAction::Water) => self.water(),
            (_, HarvestAction::Fertilize) => self.fertilize(),
        };
        vec![notice]
    }

    fn advance_turn(&mut self) -> Vec<Notice> {
        if self.status.is_terminal() {
            return vec![Notice::LevelOver];
        }
        if self.phase == HarvestPhase::Harvesting {
            return vec![Notice::NotDuringHarvest];
        }
        let mut notices = Vec::new();
        self.day = self.day.saturating_add(1);
        self.water.adjust(-HARVEST_WATER_DECAY);
        self.nutrients.adjust(-HARVEST_NUTRIENT_DECAY);
        let sun = i32::from(self.sun.value()) - HARVEST_SUN_DECAY;
        self.sun.set(sun.max(i32::from(HARVEST_SUN_FLOOR)));

        if self.water.value() < HARVEST_DRY_THRESHOLD {
            self.health.adjust(-HARVEST_DRY_PENALTY);
            notices.push(Notice::Thirsty);
        }
        // unreachable while decay is floored at HARVEST_SUN_FLOOR
        if self.sun.value() < HARVEST_SUN_FLOOR {
            self.health.adjust(-HARVEST_DARK_PENALTY);
            notices.push(Notice::NoGrowthWithoutSun);
        }
        if self.nutrients.value() < HARVEST_HUNGRY_THRESHOLD {
            self.health.adjust(-HARVEST_HUNGRY_PENALTY);
            notices.push(Notice::Hungry);
        }

        if let Some(event) = self.config.event_on(self.day) {
            self.apply_event(event);
            notices.push(Notice::SpecialEvent { event });
        }
        if self.day == HARVEST_FACT_DAY && !self.config.facts.is_empty() {
            let idx = self.rng.pick(self.config.facts.len());
            if let Some(key) = self.config.facts.get(idx) {
                notices.push(Notice::EducationalFact { key: key.clone() });
            }
        }

        if self.health.is_empty() {
            self.status = LevelStatus::Lost;
            notices.push(Notice::PlantDied);
        } else if self.day >= self.config.final_day {
            if self.health.value() >= self.config.health_gate {
                notices.push(self.start_harvest());
            } else {
                self.status = LevelStatus::Lost;
                notices.push(Notice::CropFailed);
            }
        }
        notices
    }

    fn tick(&mut self, dt: Duration) -> Vec<Notice> {
        if self.phase != HarvestPhase::Harvesting || self.status.is_terminal() {
            return Vec::new();
        }
        let mut notices = Vec::new();
        for fired in self.scheduler.advance(dt) {
            if Some(fired) != self.countdown {
                continue;
            }
            self.time_left = self.time_left.saturating_sub(1);
            if self.time_left == 0 {
                notices.push(self.finish_harvest());
                break;
            }
        }
        notices
    }

    fn completion(&self) -> Option<CompletionEvent> {
        (self.status == LevelStatus::Won)
            .then(|| CompletionEvent::new(self.number(), self.final_score()))
    }

    fn meters(&self) -> MeterSnapshot {
        vec![
            (MeterKind::Water, self.water),
            (MeterKind::Sun, self.sun),
            (MeterKind::Nutrients, self.nutrients),
            (MeterKind::Health, self.health),
            (MeterKind::Harvest, self.harvest),
        ]
    }

    fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.countdown = None;
    }
}
