//! Folding completion events into the cumulative player record.
use log::{debug, info, warn};

use crate::api::{CreatePlayerRequest, LevelCompletionRequest, ProgressApi};
use crate::error::SessionError;
use crate::player::{PlayerName, PlayerRecord};
use crate::score::CompletionEvent;

/// Apply one acknowledged completion to `record`.
///
/// Completed levels and best scores are idempotent, `current_level` never
/// decreases, and `total_score` grows on every completion including repeats.
/// Achievements belong to the service and are left alone.
#[must_use]
pub fn reduce_completion(record: &PlayerRecord, event: CompletionEvent) -> PlayerRecord {
    let mut next = record.clone();
    next.levels_completed.insert(event.level);
    next.current_level = next.current_level.max(event.level.unlocks());
    let best = next.level_scores.entry(event.level).or_insert(event.score);
    *best = (*best).max(event.score);
    next.total_score = next.total_score.saturating_add(u32::from(event.score.get()));
    next
}

/// Remote-backed operations on a player record.
///
/// Every method either returns a new record or an error; the caller's record
/// is never touched on failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    /// Validate `raw_name`, fetch the player, and create it when unknown.
    ///
    /// # Errors
    ///
    /// Validation failures never reach the service. A missing player falls
    /// back to creation; any other service error is returned as-is.
    pub async fn create_or_load_player<A>(
        api: &A,
        raw_name: &str,
    ) -> Result<PlayerRecord, SessionError>
    where
        A: ProgressApi + ?Sized,
    {
        let name = PlayerName::parse(raw_name)?;
        let dto = match api.fetch_player(name.as_str()).await {
            Ok(dto) => dto,
            Err(err) if err.is_not_found() => {
                debug!("player {name} not found, creating");
                api.create_player(&CreatePlayerRequest::new(&name)).await?
            }
            Err(err) => {
                warn!("loading player {name} failed: {err}");
                return Err(err.into());
            }
        };
        let record = PlayerRecord::try_from(dto)?;
        info!(
            "player {} ready at level {} with {} points",
            record.name, record.current_level, record.total_score
        );
        Ok(record)
    }

    /// Report `event` and, once acknowledged, return the reduced record.
    ///
    /// # Errors
    ///
    /// Returns the service error; `record` is unchanged in that case.
    pub async fn complete_level<A>(
        api: &A,
        record: &PlayerRecord,
        event: CompletionEvent,
    ) -> Result<PlayerRecord, SessionError>
    where
        A: ProgressApi + ?Sized,
    {
        let request = LevelCompletionRequest::new(&record.id, event);
        let ack = match api.complete_level(&request).await {
            Ok(ack) => ack,
            Err(err) => {
                warn!(
                    "completion of level {} for {} failed: {err}",
                    event.level, record.name
                );
                return Err(err.into());
            }
        };
        debug!(
            "level {} acknowledged ({}); service total {}",
            event.level, ack.message, ack.new_total_score
        );
        Ok(reduce_completion(record, event))
    }

    /// Re-fetch the authoritative record, picking up service-granted
    /// achievements.
    ///
    /// # Errors
    ///
    /// Returns the service error, including `NotFound` if the player vanished.
    pub async fn refresh<A>(api: &A, record: &PlayerRecord) -> Result<PlayerRecord, SessionError>
    where
        A: ProgressApi + ?Sized,
    {
        let dto = api.fetch_player(record.name.as_str()).await?;
        Ok(PlayerRecord::try_from(dto)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{LevelNumber, Score};
    use crate::service::MemoryProgressService;

    fn ana() -> PlayerRecord {
        PlayerRecord::new("p-1", PlayerName::parse("Ana").unwrap())
    }

    fn event(level: LevelNumber, score: u8) -> CompletionEvent {
        CompletionEvent::new(level, Score::new(score).unwrap())
    }

    #[test]
    fn first_completion_unlocks_next_level() {
        let record = reduce_completion(&ana(), event(LevelNumber::CLEANUP, 100));
        assert_eq!(record.current_level, 2);
        assert_eq!(
            record.levels_completed.iter().copied().collect::<Vec<_>>(),
            vec![LevelNumber::CLEANUP]
        );
        assert_eq!(record.total_score, 100);
    }

    #[test]
    fn best_score_wins_but_total_accumulates() {
        let mut record = ana();
        for score in [70, 90, 60] {
            record = reduce_completion(&record, event(LevelNumber::CLEANUP, score));
        }
        assert_eq!(record.best_score(LevelNumber::CLEANUP).get(), 90);
        assert_eq!(record.total_score, 220);
        assert_eq!(record.levels_completed.len(), 1);
    }

    #[test]
    fn replaying_an_earlier_level_keeps_current_level() {
        let mut record = ana();
        record.current_level = 4;
        let next = reduce_completion(&record, event(LevelNumber::CLEANUP, 10));
        assert_eq!(next.current_level, 4);
    }

    #[test]
    fn skipping_ahead_unlocks_past_the_highest_level() {
        let record = reduce_completion(&ana(), event(LevelNumber::CLEANUP, 80));
        let record = reduce_completion(&record, event(LevelNumber::HUSBANDRY, 60));
        assert_eq!(record.current_level, 4);
        assert_eq!(record.levels_completed.len(), 2);
        assert!(!record.levels_completed.contains(&LevelNumber::PLANTING));
    }

    #[tokio::test]
    async fn aggregator_follows_a_skip_through_the_service() {
        let service = MemoryProgressService::new();
        let record = Aggregator::create_or_load_player(&service, "Ana")
            .await
            .unwrap();
        let record = Aggregator::complete_level(&service, &record, event(LevelNumber::CLEANUP, 80))
            .await
            .unwrap();
        let record =
            Aggregator::complete_level(&service, &record, event(LevelNumber::HUSBANDRY, 60))
                .await
                .unwrap();
        assert_eq!(record.current_level, 4);
        let fresh = Aggregator::refresh(&service, &record).await.unwrap();
        assert_eq!(fresh.current_level, 4);
    }

    #[test]
    fn achievements_are_untouched() {
        let mut record = ana();
        record.achievements.insert("first_level".into());
        let next = reduce_completion(&record, event(LevelNumber::QUIZ, 100));
        assert_eq!(next.achievements, record.achievements);
        assert_eq!(next.current_level, 6);
    }
}
