//! In-memory progress service with the same rules as the hosted one.
//!
//! Used by the tester and the integration tests. Errors queued with
//! [`MemoryProgressService::fail_next`] are returned by the next calls in
//! order, before any state is read or written.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::api::{
    CompletionAck, CreatePlayerRequest, LeaderboardEntry, LevelCompletionRequest, PlayerRecordDto,
    ProgressApi,
};
use crate::constants::LEVEL_COUNT;
use crate::error::ApiError;
use crate::player::{PlayerName, PlayerRecord};
use crate::score::{LevelNumber, Score};

pub const ACHIEVEMENT_FIRST_LEVEL: &str = "first_level";
pub const ACHIEVEMENT_GAME_MASTER: &str = "game_master";
pub const ACHIEVEMENT_HIGH_SCORER: &str = "high_scorer";

const LEADERBOARD_SIZE: usize = 10;
const UNPROCESSABLE: u16 = 422;

#[derive(Debug, Clone)]
struct StoredPlayer {
    record: PlayerRecord,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredPlayer {
    fn to_dto(&self) -> PlayerRecordDto {
        PlayerRecordDto::from_record(&self.record)
            .with_timestamps(Some(self.created_at), Some(self.updated_at))
    }
}

#[derive(Debug, Default)]
struct ServiceState {
    players: Vec<StoredPlayer>,
    next_id: u64,
    queued_failures: VecDeque<ApiError>,
    completion_calls: usize,
}

#[derive(Debug, Default)]
pub struct MemoryProgressService {
    state: Mutex<ServiceState>,
}

impl MemoryProgressService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        if let Ok(mut state) = self.state.lock() {
            state.queued_failures.push_back(err);
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.state.lock().map_or(0, |state| state.players.len())
    }

    /// Number of completion requests received, failed ones included.
    #[must_use]
    pub fn completion_calls(&self) -> usize {
        self.state.lock().map_or(0, |state| state.completion_calls)
    }

    /// The stored record for `name`, as the service sees it.
    #[must_use]
    pub fn record(&self, name: &str) -> Option<PlayerRecord> {
        let state = self.state.lock().ok()?;
        state
            .players
            .iter()
            .find(|p| p.record.name.as_str() == name)
            .map(|p| p.record.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ServiceState>, ApiError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ApiError::Transport("service state lock poisoned".into()))?;
        if let Some(err) = state.queued_failures.pop_front() {
            return Err(err);
        }
        Ok(state)
    }
}

fn unprocessable(err: impl ToString) -> ApiError {
    ApiError::Rejected {
        status: UNPROCESSABLE,
        detail: err.to_string(),
    }
}

fn player_not_found() -> ApiError {
    ApiError::NotFound {
        resource: "player".into(),
    }
}

fn apply_completion(record: &mut PlayerRecord, level: LevelNumber, score: Score) {
    record.levels_completed.insert(level);
    let best = record.level_scores.entry(level).or_insert(score);
    *best = (*best).max(score);
    record.total_score = record.best_total();
    record.current_level = record.current_level.max(level.unlocks());

    if level == LevelNumber::CLEANUP {
        record.achievements.insert(ACHIEVEMENT_FIRST_LEVEL.into());
    }
    if record.levels_completed.len() == usize::from(LEVEL_COUNT) {
        record.achievements.insert(ACHIEVEMENT_GAME_MASTER.into());
    }
    if score == Score::PERFECT {
        record.achievements.insert(ACHIEVEMENT_HIGH_SCORER.into());
    }
}

#[async_trait]
impl ProgressApi for MemoryProgressService {
    async fn create_player(
        &self,
        request: &CreatePlayerRequest,
    ) -> Result<PlayerRecordDto, ApiError> {
        let name = PlayerName::parse(&request.player_name).map_err(unprocessable)?;
        let mut state = self.lock()?;
        if let Some(existing) = state.players.iter().find(|p| p.record.name == name) {
            return Ok(existing.to_dto());
        }
        state.next_id += 1;
        let now = Utc::now();
        let stored = StoredPlayer {
            record: PlayerRecord::new(format!("player-{:06}", state.next_id), name),
            created_at: now,
            updated_at: now,
        };
        let dto = stored.to_dto();
        state.players.push(stored);
        Ok(dto)
    }

    async fn fetch_player(&self, name: &str) -> Result<PlayerRecordDto, ApiError> {
        let state = self.lock()?;
        state
            .players
            .iter()
            .find(|p| p.record.name.as_str() == name)
            .map(StoredPlayer::to_dto)
            .ok_or_else(|| ApiError::NotFound {
                resource: "player progress".into(),
            })
    }

    async fn complete_level(
        &self,
        request: &LevelCompletionRequest,
    ) -> Result<CompletionAck, ApiError> {
        if let Ok(mut state) = self.state.lock() {
            state.completion_calls += 1;
        }
        let mut state = self.lock()?;
        let level = LevelNumber::try_from(request.level_number).map_err(unprocessable)?;
        let score = Score::try_from(request.score).map_err(unprocessable)?;
        let stored = state
            .players
            .iter_mut()
            .find(|p| p.record.id == request.player_id)
            .ok_or_else(player_not_found)?;
        apply_completion(&mut stored.record, level, score);
        stored.updated_at = Utc::now();
        Ok(CompletionAck {
            message: "Level completed successfully".into(),
            new_total_score: stored.record.total_score,
        })
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let state = self.lock()?;
        let mut entries: Vec<LeaderboardEntry> = state
            .players
            .iter()
            .map(|p| LeaderboardEntry {
                player_name: p.record.name.to_string(),
                total_score: p.record.total_score,
                levels_completed: p.record.levels_completed.iter().map(|l| l.get()).collect(),
            })
            .collect();
        entries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        entries.truncate(LEADERBOARD_SIZE);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create(service: &MemoryProgressService, name: &str) -> PlayerRecordDto {
        service
            .create_player(&CreatePlayerRequest {
                player_name: name.into(),
            })
            .await
            .unwrap()
    }

    fn completion(id: &str, level: u8, score: u8) -> LevelCompletionRequest {
        LevelCompletionRequest {
            player_id: id.into(),
            level_number: level,
            score,
            completion_time: None,
        }
    }

    #[tokio::test]
    async fn create_is_idempotent_by_name() {
        let service = MemoryProgressService::new();
        let first = create(&service, "Ana").await;
        let second = create(&service, "Ana").await;
        assert_eq!(first.id, second.id);
        assert_eq!(service.player_count(), 1);
        assert_eq!(first.current_level, 1);
        assert!(first.created_at.is_some());
    }

    #[tokio::test]
    async fn service_total_is_sum_of_best_scores() {
        let service = MemoryProgressService::new();
        let ana = create(&service, "Ana").await;
        service.complete_level(&completion(&ana.id, 1, 70)).await.unwrap();
        let ack = service.complete_level(&completion(&ana.id, 1, 90)).await.unwrap();
        assert_eq!(ack.new_total_score, 90);
        let ack = service.complete_level(&completion(&ana.id, 2, 40)).await.unwrap();
        assert_eq!(ack.new_total_score, 130);
        let dto = service.fetch_player("Ana").await.unwrap();
        assert_eq!(dto.level_scores.get("1"), Some(&90));
        assert_eq!(dto.current_level, 3);
        assert_eq!(dto.achievements, vec![ACHIEVEMENT_FIRST_LEVEL.to_string()]);
    }

    #[tokio::test]
    async fn achievements_follow_service_rules() {
        let service = MemoryProgressService::new();
        let ana = create(&service, "Ana").await;
        for level in 1..=5 {
            let score = if level == 3 { 100 } else { 80 };
            service
                .complete_level(&completion(&ana.id, level, score))
                .await
                .unwrap();
        }
        let record = service.record("Ana").unwrap();
        assert!(record.has_achievement(ACHIEVEMENT_FIRST_LEVEL));
        assert!(record.has_achievement(ACHIEVEMENT_GAME_MASTER));
        assert!(record.has_achievement(ACHIEVEMENT_HIGH_SCORER));
        assert_eq!(record.current_level, 6);
    }

    #[tokio::test]
    async fn invalid_requests_are_rejected() {
        let service = MemoryProgressService::new();
        let ana = create(&service, "Ana").await;
        assert!(matches!(
            service.complete_level(&completion(&ana.id, 9, 10)).await,
            Err(ApiError::Rejected { status: 422, .. })
        ));
        assert!(matches!(
            service.complete_level(&completion(&ana.id, 1, 101)).await,
            Err(ApiError::Rejected { .. })
        ));
        assert!(
            service
                .complete_level(&completion("nobody", 1, 10))
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(service.fetch_player("Luis").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn queued_failure_hits_next_call_only() {
        let service = MemoryProgressService::new();
        service.fail_next(ApiError::Transport("offline".into()));
        assert_eq!(
            service
                .create_player(&CreatePlayerRequest {
                    player_name: "Ana".into()
                })
                .await,
            Err(ApiError::Transport("offline".into()))
        );
        assert_eq!(service.player_count(), 0);
        create(&service, "Ana").await;
        assert_eq!(service.player_count(), 1);
    }

    #[tokio::test]
    async fn leaderboard_is_sorted_and_capped() {
        let service = MemoryProgressService::new();
        for n in 0..12u8 {
            let dto = create(&service, &format!("Player {n}")).await;
            service
                .complete_level(&completion(&dto.id, 1, n * 5))
                .await
                .unwrap();
        }
        let board = service.leaderboard().await.unwrap();
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].player_name, "Player 11");
        assert!(board.windows(2).all(|w| w[0].total_score >= w[1].total_score));
    }
}
