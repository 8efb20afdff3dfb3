//! Player-facing messages produced by level actions and turns.
use serde::{Deserialize, Serialize};

use crate::data::SpecialEventKind;
use crate::levels::husbandry::Boost;

/// Visual tone of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Info,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The level already reached a terminal state; nothing changed.
    LevelOver,
    /// Action index does not address anything on the board.
    NoSuchTarget { index: usize },

    // Level 1
    ContaminantRemoved { remaining: u8 },
    AlreadyCleaned { index: usize },
    StreamRestored,

    // Level 2
    PatchFertilized { remaining_fertilizer: u8 },
    OutOfFertilizer,
    AlreadyFertilized { index: usize },
    NeedsFertilizer { index: usize },
    MunaPlanted { planted: u8 },
    AlreadyPlanted { index: usize },
    FieldComplete,

    // Level 3
    BoostQueued { boost: Boost },
    BoostCancelled { boost: Boost },
    RootsRotting,
    TooHot,
    NeedsSun,
    IdealConditions,
    InfusionReady { infusions: u8 },
    PlantDied,

    // Level 4
    WateredWell,
    Overwatered,
    FertilizedWell,
    Overfertilized,
    Thirsty,
    NoGrowthWithoutSun,
    Hungry,
    SpecialEvent { event: SpecialEventKind },
    EducationalFact { key: String },
    HarvestStarted { seconds: u32 },
    EarHarvested { points: u8, total: u8 },
    HarvestNotReady,
    HarvestComplete { harvest_score: u8 },
    NotDuringHarvest,
    CropFailed,

    // Level 5
    CorrectAnswer,
    WrongAnswer { correct: usize },
    AlreadyAnswered,
    AnswerFirst,
    QuizFinished { correct: u32, total: u32 },
}

impl Notice {
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Self::LevelOver => "notice.level_over",
            Self::NoSuchTarget { .. } => "notice.no_such_target",
            Self::ContaminantRemoved { .. } => "cleanup.removed",
            Self::AlreadyCleaned { .. } => "cleanup.already_cleaned",
            Self::StreamRestored => "cleanup.restored",
            Self::PatchFertilized { .. } => "planting.fertilized",
            Self::OutOfFertilizer => "planting.out_of_fertilizer",
            Self::AlreadyFertilized { .. } => "planting.already_fertilized",
            Self::NeedsFertilizer { .. } => "planting.needs_fertilizer",
            Self::MunaPlanted { .. } => "planting.planted",
            Self::AlreadyPlanted { .. } => "planting.already_planted",
            Self::FieldComplete => "planting.complete",
            Self::BoostQueued { .. } => "husbandry.boost_queued",
            Self::BoostCancelled { .. } => "husbandry.boost_cancelled",
            Self::RootsRotting => "husbandry.roots_rotting",
            Self::TooHot => "husbandry.too_hot",
            Self::NeedsSun => "husbandry.needs_sun",
            Self::IdealConditions => "husbandry.ideal",
            Self::InfusionReady { .. } => "husbandry.infusion",
            Self::PlantDied => "husbandry.died",
            Self::WateredWell => "harvest.watered",
            Self::Overwatered => "harvest.overwatered",
            Self::FertilizedWell => "harvest.fertilized",
            Self::Overfertilized => "harvest.overfertilized",
            Self::Thirsty => "harvest.thirsty",
            Self::NoGrowthWithoutSun => "harvest.no_sun",
            Self::Hungry => "harvest.hungry",
            Self::SpecialEvent { event } => match event {
                SpecialEventKind::Rain => "harvest.event.rain",
                SpecialEventKind::Plague => "harvest.event.plague",
                SpecialEventKind::Heat => "harvest.event.heat",
            },
            Self::EducationalFact { .. } => "harvest.fact",
            Self::HarvestStarted { .. } => "harvest.minigame.start",
            Self::EarHarvested { .. } => "harvest.minigame.ear",
            Self::HarvestNotReady => "harvest.minigame.not_ready",
            Self::HarvestComplete { .. } => "harvest.minigame.done",
            Self::NotDuringHarvest => "harvest.minigame.busy",
            Self::CropFailed => "harvest.failed",
            Self::CorrectAnswer => "quiz.correct",
            Self::WrongAnswer { .. } => "quiz.wrong",
            Self::AlreadyAnswered => "quiz.already_answered",
            Self::AnswerFirst => "quiz.answer_first",
            Self::QuizFinished { .. } => "quiz.finished",
        }
    }

    #[must_use]
    pub const fn tone(&self) -> Tone {
        match self {
            Self::ContaminantRemoved { .. }
            | Self::StreamRestored
            | Self::PatchFertilized { .. }
            | Self::MunaPlanted { .. }
            | Self::FieldComplete
            | Self::IdealConditions
            | Self::InfusionReady { .. }
            | Self::WateredWell
            | Self::FertilizedWell
            | Self::EarHarvested { .. }
            | Self::HarvestComplete { .. }
            | Self::CorrectAnswer
            | Self::QuizFinished { .. } => Tone::Success,
            Self::PlantDied
            | Self::Overwatered
            | Self::Overfertilized
            | Self::Thirsty
            | Self::NoGrowthWithoutSun
            | Self::CropFailed
            | Self::WrongAnswer { .. } => Tone::Danger,
            Self::OutOfFertilizer
            | Self::AlreadyFertilized { .. }
            | Self::NeedsFertilizer { .. }
            | Self::AlreadyPlanted { .. }
            | Self::AlreadyCleaned { .. }
            | Self::RootsRotting
            | Self::TooHot
            | Self::NeedsSun
            | Self::Hungry
            | Self::SpecialEvent { .. }
            | Self::HarvestNotReady
            | Self::NotDuringHarvest
            | Self::AnswerFirst
            | Self::AlreadyAnswered => Tone::Warning,
            Self::LevelOver
            | Self::NoSuchTarget { .. }
            | Self::BoostQueued { .. }
            | Self::BoostCancelled { .. }
            | Self::EducationalFact { .. }
            | Self::HarvestStarted { .. } => Tone::Info,
        }
    }
}
