//! Scripted players for each level, driving a live [`GameSession`].
use anyhow::{Context, Result, bail};
use guardianes_game::{
    Boost, CleanupAction, CompletionEvent, GameSession, HarvestAction, HarvestPhase,
    LevelAction, LevelCompletionRequest, LevelNumber, LevelStatus, MemoryNameSlot,
    MemoryProgressService, MeterKind, PlantingAction, ProgressApi, QuizAction, StepOutcome,
};
use log::debug;
use std::time::Duration;

pub type Session = GameSession<MemoryProgressService, MemoryNameSlot>;

/// Husbandry days before a run is abandoned.
pub const HUSBANDRY_DAY_CAP: u32 = 120;

/// Fresh-weather retries a campaign allows for husbandry.
pub const HUSBANDRY_ATTEMPTS: u64 = 6;

const WATER_REFILL_BELOW: u8 = 38;
const SUN_REFILL_BELOW: u8 = 65;
const NUTRIENT_REFILL_BELOW: u8 = 43;

/// What one scripted attempt at a level produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRun {
    pub level: u8,
    pub status: LevelStatus,
    pub score: Option<u8>,
    pub turns: u32,
    pub notices: usize,
    /// The field ran out of moves before reaching its target.
    pub stalled: bool,
}

impl LevelRun {
    const fn new(level: LevelNumber) -> Self {
        Self {
            level: level.get(),
            status: LevelStatus::Playing,
            score: None,
            turns: 0,
            notices: 0,
            stalled: false,
        }
    }

    #[must_use]
    pub fn won(&self) -> bool {
        self.status == LevelStatus::Won
    }

    fn absorb(&mut self, outcome: StepOutcome) -> Result<()> {
        if let Some(err) = outcome.submit_error {
            bail!("level {} completion was not recorded: {err}", self.level);
        }
        self.notices += outcome.notices.len();
        self.status = outcome.status;
        if let Some(CompletionEvent { score, .. }) = outcome.recorded {
            self.score = Some(score.get());
        }
        Ok(())
    }
}

/// How the quiz player picks answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStrategy {
    Perfect,
    /// Miss question `i` whenever bit `i` of the seed is set.
    Seeded(u64),
}

impl QuizStrategy {
    const fn choose(self, index: usize, correct: usize, options: usize) -> usize {
        match self {
            Self::Perfect => correct,
            Self::Seeded(seed) => {
                if index < 64 && (seed >> index) & 1 == 1 && options > 1 {
                    (correct + 1) % options
                } else {
                    correct
                }
            }
        }
    }
}

async fn act(session: &mut Session, run: &mut LevelRun, action: LevelAction) -> Result<()> {
    let outcome = session.act(action).await?;
    run.absorb(outcome)
}

async fn turn(session: &mut Session, run: &mut LevelRun) -> Result<()> {
    let outcome = session.advance_turn().await?;
    run.turns += 1;
    run.absorb(outcome)
}

/// Report completions straight to the service so `level` becomes playable,
/// then refresh the cached record.
pub async fn unlock_through(session: &mut Session, level: LevelNumber, score: u8) -> Result<()> {
    let player_id = session
        .player()
        .map(|p| p.id.clone())
        .context("no player loaded")?;
    for earlier in LevelNumber::ALL.into_iter().filter(|l| *l < level) {
        session
            .api()
            .complete_level(&LevelCompletionRequest {
                player_id: player_id.clone(),
                level_number: earlier.get(),
                score,
                completion_time: None,
            })
            .await?;
    }
    session.refresh_player().await?;
    Ok(())
}

pub async fn play_cleanup(session: &mut Session, seed: u64) -> Result<LevelRun> {
    let mut run = LevelRun::new(LevelNumber::CLEANUP);
    session.start_level(LevelNumber::CLEANUP, seed)?;
    let total = session.config().cleanup.contaminants.len();
    // start from a seed-chosen item so runs differ in order
    let offset = usize::try_from(seed).unwrap_or(0) % total.max(1);
    for step in 0..total {
        let index = (offset + step) % total;
        act(session, &mut run, LevelAction::Cleanup(CleanupAction::Remove(index))).await?;
    }
    Ok(run)
}

pub async fn play_planting(session: &mut Session, seed: u64) -> Result<LevelRun> {
    let mut run = LevelRun::new(LevelNumber::PLANTING);
    session.start_level(LevelNumber::PLANTING, seed)?;
    let patches = session.config().planting.patches;
    for index in 0..patches {
        if run.status.is_terminal() {
            break;
        }
        act(session, &mut run, LevelAction::Planting(PlantingAction::Fertilize(index))).await?;
        act(session, &mut run, LevelAction::Planting(PlantingAction::Plant(index))).await?;
        let stalled = session
            .active_level()
            .and_then(|level| level.as_planting())
            .is_some_and(|sim| sim.is_stalled());
        if stalled {
            debug!("planting stalled after patch {index}");
            run.stalled = true;
            break;
        }
    }
    Ok(run)
}

/// Keep every meter inside its ideal band after the daily decay.
pub async fn play_husbandry(session: &mut Session, seed: u64) -> Result<LevelRun> {
    let mut run = LevelRun::new(LevelNumber::HUSBANDRY);
    session.start_level(LevelNumber::HUSBANDRY, seed)?;
    while run.status == LevelStatus::Playing && run.turns < HUSBANDRY_DAY_CAP {
        let meters = session
            .active_level()
            .map(|level| level.meters())
            .unwrap_or_default();
        for (kind, meter) in meters {
            let boost = match kind {
                MeterKind::Water if meter.value() < WATER_REFILL_BELOW => Boost::Water,
                MeterKind::Sun if meter.value() < SUN_REFILL_BELOW => Boost::Sun,
                MeterKind::Nutrients if meter.value() < NUTRIENT_REFILL_BELOW => {
                    Boost::Fertilize
                }
                _ => continue,
            };
            act(session, &mut run, LevelAction::Husbandry(boost)).await?;
        }
        turn(session, &mut run).await?;
    }
    Ok(run)
}

/// Replay husbandry with a new weather seed until it is won or the attempts
/// run out. Every attempt is returned in order.
pub async fn play_husbandry_until_won(session: &mut Session, seed: u64) -> Result<Vec<LevelRun>> {
    let mut runs = Vec::new();
    for attempt in 0..HUSBANDRY_ATTEMPTS {
        let run = play_husbandry(session, seed.wrapping_add(attempt)).await?;
        let won = run.won();
        if !won {
            debug!("husbandry attempt {attempt} ended {:?}", run.status);
        }
        runs.push(run);
        if won {
            break;
        }
    }
    Ok(runs)
}

fn harvest_full(session: &Session) -> bool {
    session
        .active_level()
        .and_then(|level| level.as_harvest())
        .is_none_or(|sim| sim.harvest_score().is_full())
}

/// Care for the crop whenever the cooldowns allow, fill the basket, then let
/// the countdown run out.
pub async fn play_harvest(session: &mut Session, seed: u64) -> Result<LevelRun> {
    let mut run = LevelRun::new(LevelNumber::HARVEST);
    session.start_level(LevelNumber::HARVEST, seed)?;
    loop {
        let Some(sim) = session.active_level().and_then(|level| level.as_harvest()) else {
            bail!("harvest level closed unexpectedly");
        };
        if sim.phase() != HarvestPhase::Growing || run.status.is_terminal() {
            break;
        }
        let (water, fertilize) = (sim.can_water(), sim.can_fertilize());
        if water {
            act(session, &mut run, LevelAction::Harvest(HarvestAction::Water)).await?;
        }
        if fertilize {
            act(session, &mut run, LevelAction::Harvest(HarvestAction::Fertilize)).await?;
        }
        turn(session, &mut run).await?;
    }
    if run.status.is_terminal() {
        return Ok(run);
    }

    // keep clicking round the ears until the basket is full
    let ears = session.config().harvest.ears.max(1);
    let mut index = 0;
    while !harvest_full(session) && run.status == LevelStatus::Playing {
        act(session, &mut run, LevelAction::Harvest(HarvestAction::Harvest(index))).await?;
        index = (index + 1) % ears;
    }
    let countdown = session.config().harvest.countdown_secs;
    for _ in 0..=countdown {
        if run.status.is_terminal() {
            break;
        }
        let outcome = session.tick(Duration::from_secs(1)).await?;
        run.absorb(outcome)?;
    }
    Ok(run)
}

pub async fn play_quiz(session: &mut Session, strategy: QuizStrategy) -> Result<LevelRun> {
    let mut run = LevelRun::new(LevelNumber::QUIZ);
    session.start_level(LevelNumber::QUIZ, 0)?;
    while run.status == LevelStatus::Playing {
        let Some(choice) = session
            .active_level()
            .and_then(|level| level.as_quiz())
            .and_then(|sim| {
                sim.current_question().map(|q| {
                    strategy.choose(sim.current_index(), q.correct, q.options.len())
                })
            })
        else {
            break;
        };
        act(session, &mut run, LevelAction::Quiz(QuizAction::Answer(choice))).await?;
        turn(session, &mut run).await?;
    }
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_quiz_misses_on_set_bits() {
        let strategy = QuizStrategy::Seeded(0b101);
        assert_eq!(strategy.choose(0, 1, 3), 2);
        assert_eq!(strategy.choose(1, 1, 3), 1);
        assert_eq!(strategy.choose(2, 2, 3), 0);
        assert_eq!(QuizStrategy::Perfect.choose(0, 2, 3), 2);
    }

    #[tokio::test]
    async fn husbandry_retries_until_a_win() {
        let mut session = Session::new(MemoryProgressService::new(), MemoryNameSlot::new());
        session.create_or_load_player("QA").await.unwrap();
        unlock_through(&mut session, LevelNumber::HUSBANDRY, 50)
            .await
            .unwrap();
        let runs = play_husbandry_until_won(&mut session, 9).await.unwrap();
        let last = runs.last().unwrap();
        assert!(last.won(), "{runs:?}");
        assert_eq!(last.score, Some(100));
        assert!(runs[..runs.len() - 1].iter().all(|run| run.score.is_none()));
        assert_eq!(session.player().unwrap().current_level, 4);
    }
}
