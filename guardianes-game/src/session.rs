//! The session object the UI drives: one player, at most one open level.
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::time::Duration;

use crate::api::{LeaderboardEntry, ProgressApi};
use crate::data::{LevelsConfig, QuizBank};
use crate::error::{SessionError, ValidationError};
use crate::levels::{ActiveLevel, LevelAction, LevelStatus, Notice};
use crate::player::PlayerRecord;
use crate::progress::Aggregator;
use crate::score::{CompletionEvent, LevelNumber};
use crate::storage::NameSlot;

/// Result of one action, turn, or tick against the open level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepOutcome {
    pub notices: Vec<Notice>,
    pub status: LevelStatus,
    /// The completion acknowledged by the service during this step.
    pub recorded: Option<CompletionEvent>,
    /// Why this step's completion could not be reported; it stays pending.
    pub submit_error: Option<SessionError>,
}

/// High-level session wrapper binding the progress service, the name slot,
/// and the open level.
///
/// Completions are reported in the order levels are won because every
/// mutating call takes `&mut self`.
#[derive(Debug)]
pub struct GameSession<A, S> {
    api: A,
    slot: S,
    config: LevelsConfig,
    quiz: QuizBank,
    player: Option<PlayerRecord>,
    active: Option<ActiveLevel>,
    level_elapsed: Duration,
    reported: bool,
    pending: VecDeque<CompletionEvent>,
    last_error: Option<SessionError>,
}

impl<A, S> GameSession<A, S>
where
    A: ProgressApi,
    S: NameSlot,
{
    /// Session using the embedded level tuning and quiz bank.
    #[must_use]
    pub fn new(api: A, slot: S) -> Self {
        Self::with_content(api, slot, LevelsConfig::default_config(), QuizBank::default_bank())
    }

    #[must_use]
    pub const fn with_content(api: A, slot: S, config: LevelsConfig, quiz: QuizBank) -> Self {
        Self {
            api,
            slot,
            config,
            quiz,
            player: None,
            active: None,
            level_elapsed: Duration::ZERO,
            reported: false,
            pending: VecDeque::new(),
            last_error: None,
        }
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    pub const fn slot(&self) -> &S {
        &self.slot
    }

    pub const fn config(&self) -> &LevelsConfig {
        &self.config
    }

    pub const fn quiz(&self) -> &QuizBank {
        &self.quiz
    }

    /// Cached player record, if one is loaded.
    pub const fn player(&self) -> Option<&PlayerRecord> {
        self.player.as_ref()
    }

    pub const fn active_level(&self) -> Option<&ActiveLevel> {
        self.active.as_ref()
    }

    /// Won levels whose completion has not been acknowledged yet.
    pub fn pending_completions(&self) -> impl Iterator<Item = &CompletionEvent> {
        self.pending.iter()
    }

    pub const fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    /// Load the player remembered in the name slot, if any.
    ///
    /// # Errors
    ///
    /// Propagates slot and service failures.
    pub async fn resume(&mut self) -> Result<Option<&PlayerRecord>, SessionError> {
        let stored = self
            .slot
            .load()
            .map_err(|err| SessionError::Storage(err.to_string()))?;
        let Some(name) = stored else {
            debug!("no remembered player");
            return Ok(None);
        };
        info!("resuming session for {name}");
        self.create_or_load_player(name.as_str()).await.map(Some)
    }

    /// Fetch or create the player and remember the name locally.
    ///
    /// # Errors
    ///
    /// Validation, service, and slot failures. The cached player is replaced
    /// only on success.
    pub async fn create_or_load_player(
        &mut self,
        name: &str,
    ) -> Result<&PlayerRecord, SessionError> {
        let loaded = Aggregator::create_or_load_player(&self.api, name).await;
        let record = match loaded {
            Ok(record) => record,
            Err(err) => return Err(self.fail(err)),
        };
        self.slot
            .store(&record.name)
            .map_err(|err| self.fail(SessionError::Storage(err.to_string())))?;
        if self.player.as_ref().is_some_and(|p| p.id != record.id) {
            self.exit_level();
            self.pending.clear();
        }
        self.last_error = None;
        Ok(self.player.insert(record))
    }

    /// Re-fetch the cached player from the service.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoPlayer`] or the service failure.
    pub async fn refresh_player(&mut self) -> Result<&PlayerRecord, SessionError> {
        let current = self.player.as_ref().ok_or(SessionError::NoPlayer)?;
        let refreshed = Aggregator::refresh(&self.api, current).await;
        match refreshed {
            Ok(record) => Ok(self.player.insert(record)),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Drop the cached player and forget the remembered name.
    ///
    /// # Errors
    ///
    /// Returns the slot failure; the session is signed out regardless.
    pub fn sign_out(&mut self) -> Result<(), SessionError> {
        self.exit_level();
        self.pending.clear();
        if let Some(player) = self.player.take() {
            info!("signing out {}", player.name);
        }
        self.slot
            .clear()
            .map_err(|err| SessionError::Storage(err.to_string()))
    }

    /// # Errors
    ///
    /// Returns the service failure.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, SessionError> {
        Ok(self.api.leaderboard().await?)
    }

    /// Open a fresh instance of `level`, closing any level already open.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoPlayer`] without a player, or
    /// [`ValidationError::LevelLocked`] when the player has not reached it.
    pub fn start_level(
        &mut self,
        level: LevelNumber,
        seed: u64,
    ) -> Result<&ActiveLevel, SessionError> {
        let player = self.player.as_ref().ok_or(SessionError::NoPlayer)?;
        if !player.is_unlocked(level) {
            return Err(ValidationError::LevelLocked {
                level,
                current: player.current_level,
            }
            .into());
        }
        let name = player.name.clone();
        self.exit_level();
        info!("starting level {level} for {name} (seed {seed})");
        self.level_elapsed = Duration::ZERO;
        self.reported = false;
        Ok(self
            .active
            .insert(ActiveLevel::start(level, &self.config, &self.quiz, seed)))
    }

    /// Apply `action` to the open level.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoActiveLevel`] or [`SessionError::WrongLevel`].
    /// Reporting failures are returned inside the outcome instead.
    pub async fn act(&mut self, action: LevelAction) -> Result<StepOutcome, SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveLevel)?;
        let notices = active.apply_action(action)?;
        Ok(self.settle(notices).await)
    }

    /// Advance the open level by one turn.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoActiveLevel`].
    pub async fn advance_turn(&mut self) -> Result<StepOutcome, SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveLevel)?;
        let notices = active.advance_turn();
        Ok(self.settle(notices).await)
    }

    /// Feed `dt` of wall-clock time to the open level.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoActiveLevel`].
    pub async fn tick(&mut self, dt: Duration) -> Result<StepOutcome, SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveLevel)?;
        if active.status() == LevelStatus::Playing {
            self.level_elapsed = self.level_elapsed.saturating_add(dt);
        }
        let notices = active.tick(dt);
        Ok(self.settle(notices).await)
    }

    /// Retry reporting completions that failed earlier.
    ///
    /// # Errors
    ///
    /// The first failure; later completions stay queued behind it.
    pub async fn submit_pending(&mut self) -> Result<Option<&PlayerRecord>, SessionError> {
        self.flush_pending().await?;
        Ok(self.player.as_ref())
    }

    /// Close the open level, cancelling its timers.
    pub fn exit_level(&mut self) {
        if let Some(mut level) = self.active.take() {
            level.teardown();
            debug!("exited level {} ({:?})", level.number(), level.status());
        }
    }

    /// Close the session and hand back the cached record.
    #[must_use]
    pub fn end(mut self) -> Option<PlayerRecord> {
        self.exit_level();
        if !self.pending.is_empty() {
            warn!(
                "ending session with {} unreported completion(s)",
                self.pending.len()
            );
        }
        self.player.take()
    }

    async fn settle(&mut self, notices: Vec<Notice>) -> StepOutcome {
        let mut outcome = StepOutcome {
            notices,
            ..StepOutcome::default()
        };
        let Some(active) = self.active.as_ref() else {
            return outcome;
        };
        outcome.status = active.status();
        if self.reported {
            return outcome;
        }
        let Some(event) = active.completion() else {
            return outcome;
        };
        self.reported = true;
        let event = event.with_completion_time(self.completion_seconds());
        info!("level {} won with score {}", event.level, event.score);
        self.pending.push_back(event);
        match self.flush_pending().await {
            Ok(()) => outcome.recorded = Some(event),
            Err(err) => outcome.submit_error = Some(err),
        }
        outcome
    }

    async fn flush_pending(&mut self) -> Result<(), SessionError> {
        while let Some(event) = self.pending.front().copied() {
            let Some(player) = self.player.as_ref() else {
                return Err(self.fail(SessionError::NoPlayer));
            };
            let reported = Aggregator::complete_level(&self.api, player, event).await;
            match reported {
                Ok(record) => {
                    self.player = Some(record);
                    self.pending.pop_front();
                }
                Err(err) => return Err(self.fail(err)),
            }
        }
        self.last_error = None;
        Ok(())
    }

    fn completion_seconds(&self) -> Option<u32> {
        let secs = self.level_elapsed.as_secs();
        (secs > 0).then(|| u32::try_from(secs).unwrap_or(u32::MAX))
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        warn!("session error: {err}");
        self.last_error = Some(err.clone());
        err
    }
}
