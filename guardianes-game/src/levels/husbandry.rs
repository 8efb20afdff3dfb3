//! Level 3: day-by-day care of a chachacoma plant.
//!
//! The player queues boosts for the coming day and then advances the turn.
//! Each turn applies the boosts, decays every meter, rolls the weather, and
//! rescores health. Five healthy days in a row produce an infusion; three
//! infusions win the level.
use serde::{Deserialize, Serialize};

use super::{LevelSimulator, LevelStatus, Notice};
use crate::constants::{
    HUSBANDRY_HEALTHY_ABOVE, HUSBANDRY_HEAT_PENALTY, HUSBANDRY_IDEAL_BONUS,
    HUSBANDRY_IDEAL_NUTRIENTS, HUSBANDRY_IDEAL_SUN, HUSBANDRY_IDEAL_WATER,
    HUSBANDRY_LOW_SUN_PENALTY, HUSBANDRY_LOW_SUN_THRESHOLD, HUSBANDRY_NUTRIENT_BOOST,
    HUSBANDRY_NUTRIENT_DECAY, HUSBANDRY_OVERWATER_PENALTY, HUSBANDRY_OVERWATER_THRESHOLD,
    HUSBANDRY_SUN_BOOST, HUSBANDRY_SUN_DECAY, HUSBANDRY_WATER_BOOST, HUSBANDRY_WATER_DECAY,
};
use crate::data::HusbandryConfig;
use crate::meter::{Meter, MeterKind, MeterSnapshot};
use crate::rng::RandomSource;
use crate::score::{CompletionEvent, LevelNumber, Score};

/// A care action queued for the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boost {
    Water,
    Fertilize,
    Sun,
}

impl Boost {
    const fn delta(self) -> (MeterKind, i32) {
        match self {
            Self::Water => (MeterKind::Water, HUSBANDRY_WATER_BOOST),
            Self::Fertilize => (MeterKind::Nutrients, HUSBANDRY_NUTRIENT_BOOST),
            Self::Sun => (MeterKind::Sun, HUSBANDRY_SUN_BOOST),
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Water => 0,
            Self::Fertilize => 1,
            Self::Sun => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Cold,
    Hot,
}

#[derive(Debug)]
pub struct HusbandrySim {
    config: HusbandryConfig,
    water: Meter,
    sun: Meter,
    nutrients: Meter,
    health: Meter,
    weather: Weather,
    day: u32,
    healthy_streak: u8,
    infusions: u8,
    score: u32,
    pending: [bool; 3],
    status: LevelStatus,
    rng: Box<dyn RandomSource>,
}

impl HusbandrySim {
    #[must_use]
    pub fn new(config: HusbandryConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            water: Meter::from(config.start.water),
            sun: Meter::from(config.start.sun),
            nutrients: Meter::from(config.start.nutrients),
            health: Meter::from(config.start.health),
            config,
            weather: Weather::Cold,
            day: 1,
            healthy_streak: 0,
            infusions: 0,
            score: 0,
            pending: [false; 3],
            status: LevelStatus::Playing,
            rng,
        }
    }

    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    #[must_use]
    pub const fn weather(&self) -> Weather {
        self.weather
    }

    #[must_use]
    pub const fn infusions(&self) -> u8 {
        self.infusions
    }

    #[must_use]
    pub const fn healthy_streak(&self) -> u8 {
        self.healthy_streak
    }

    /// Raw accumulated score; the submitted score is capped at 100.
    #[must_use]
    pub const fn raw_score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn is_queued(&self, boost: Boost) -> bool {
        self.pending[boost.slot()]
    }

    fn meter_mut(&mut self, kind: MeterKind) -> &mut Meter {
        match kind {
            MeterKind::Water => &mut self.water,
            MeterKind::Sun => &mut self.sun,
            MeterKind::Nutrients => &mut self.nutrients,
            MeterKind::Health | MeterKind::Harvest => &mut self.health,
        }
    }

    fn apply_boosts(&mut self) {
        for boost in [Boost::Water, Boost::Fertilize, Boost::Sun] {
            if std::mem::take(&mut self.pending[boost.slot()]) {
                let (kind, delta) = boost.delta();
                self.meter_mut(kind).adjust(delta);
            }
        }
    }

    fn decay(&mut self) {
        self.water.adjust(-HUSBANDRY_WATER_DECAY);
        self.sun.adjust(-HUSBANDRY_SUN_DECAY);
        self.nutrients.adjust(-HUSBANDRY_NUTRIENT_DECAY);
    }

    fn roll_weather(&mut self) {
        self.weather = if self.rng.roll_pct() < self.config.hot_chance_pct {
            Weather::Hot
        } else {
            Weather::Cold
        };
    }

    fn rescore_health(&mut self, notices: &mut Vec<Notice>) {
        let mut health = i32::from(self.health.value());
        if self.water.value() > HUSBANDRY_OVERWATER_THRESHOLD {
            health -= HUSBANDRY_OVERWATER_PENALTY;
            notices.push(Notice::RootsRotting);
        }
        if self.weather == Weather::Hot {
            health -= HUSBANDRY_HEAT_PENALTY;
            notices.push(Notice::TooHot);
        }
        if self.sun.value() < HUSBANDRY_LOW_SUN_THRESHOLD {
            health -= HUSBANDRY_LOW_SUN_PENALTY;
            notices.push(Notice::NeedsSun);
        }
        if self.water.within(HUSBANDRY_IDEAL_WATER)
            && self.sun.within(HUSBANDRY_IDEAL_SUN)
            && self.nutrients.within(HUSBANDRY_IDEAL_NUTRIENTS)
        {
            health += HUSBANDRY_IDEAL_BONUS;
            notices.push(Notice::IdealConditions);
        }
        self.health.set(health);
    }

    fn track_streak(&mut self, notices: &mut Vec<Notice>) {
        if self.health.value() > HUSBANDRY_HEALTHY_ABOVE {
            self.healthy_streak = self.healthy_streak.saturating_add(1);
        } else {
            self.healthy_streak = 0;
        }
        if self.healthy_streak >= self.config.streak_for_infusion {
            self.healthy_streak = 0;
            self.infusions = self.infusions.saturating_add(1);
            self.score = self.score.saturating_add(self.config.infusion_score);
            notices.push(Notice::InfusionReady {
                infusions: self.infusions,
            });
        }
    }
}

impl LevelSimulator for HusbandrySim {
    type Action = Boost;

    fn number(&self) -> LevelNumber {
        LevelNumber::HUSBANDRY
    }

    fn status(&self) -> LevelStatus {
        self.status
    }

    /// Toggle `boost` for the coming day.
    fn apply_action(&mut self, boost: Boost) -> Vec<Notice> {
        if self.status.is_terminal() {
            return vec![Notice::LevelOver];
        }
        let slot = &mut self.pending[boost.slot()];
        *slot = !*slot;
        if *slot {
            vec![Notice::BoostQueued { boost }]
        } else {
            vec![Notice::BoostCancelled { boost }]
        }
    }

    fn advance_turn(&mut self) -> Vec<Notice> {
        if self.status.is_terminal() {
            return vec![Notice::LevelOver];
        }
        let mut notices = Vec::new();
        self.apply_boosts();
        self.decay();
        self.roll_weather();
        self.day = self.day.saturating_add(1);
        self.rescore_health(&mut notices);
        self.track_streak(&mut notices);

        if self.infusions >= self.config.infusions_to_win {
            self.status = LevelStatus::Won;
        } else if self.health.is_empty() {
            self.status = LevelStatus::Lost;
            notices.push(Notice::PlantDied);
        }
        notices
    }

    fn completion(&self) -> Option<CompletionEvent> {
        (self.status == LevelStatus::Won)
            .then(|| CompletionEvent::new(self.number(), Score::saturating(self.score)))
    }

    fn meters(&self) -> MeterSnapshot {
        vec![
            (MeterKind::Water, self.water),
            (MeterKind::Sun, self.sun),
            (MeterKind::Nutrients, self.nutrients),
            (MeterKind::Health, self.health),
        ]
    }
}
