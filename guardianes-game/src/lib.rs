//! Guardianes de las Plantas del Perú game engine
//!
//! Platform-agnostic core logic for the educational plant-care game: five
//! level simulators, the progress aggregator, and the session that ties them
//! to a remote progress service. This crate has no UI or transport code.

pub mod api;
pub mod constants;
pub mod data;
pub mod error;
pub mod levels;
pub mod meter;
pub mod numbers;
pub mod player;
pub mod progress;
pub mod rng;
pub mod scheduler;
pub mod score;
pub mod service;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use api::{
    CompletionAck, CreatePlayerRequest, LeaderboardEntry, LevelCompletionRequest, PlayerRecordDto,
    ProgressApi,
};
pub use data::{
    CleanupConfig, HarvestConfig, HusbandryConfig, LevelsConfig, PlantingConfig, Question,
    QuizBank, SpecialEvent, SpecialEventKind, StartMeters,
};
pub use error::{ApiError, ConfigError, SessionError, ValidationError};
pub use levels::{
    ActiveLevel, Boost, CleanupAction, CleanupSim, HarvestAction, HarvestPhase, HarvestSim,
    HusbandrySim, LevelAction, LevelSimulator, LevelStatus, Notice, Patch, PlantingAction,
    PlantingSim, QuizAction, QuizSim, Tone, Weather,
};
pub use meter::{Meter, MeterKind, MeterSnapshot};
pub use player::{PlayerName, PlayerRecord};
pub use progress::{Aggregator, reduce_completion};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use scheduler::{Scheduler, TimerId};
pub use score::{CompletionEvent, LevelNumber, Score};
pub use service::MemoryProgressService;
pub use session::{GameSession, StepOutcome};
pub use storage::{FileNameSlot, FileSlotError, MemoryNameSlot, NameSlot};
