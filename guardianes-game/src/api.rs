//! Contract with the remote progress service and its wire types.
//!
//! The transport is not part of this crate; anything that can answer these
//! four calls can back a [`crate::session::GameSession`].
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ApiError;
use crate::player::{PlayerName, PlayerRecord};
use crate::score::{CompletionEvent, LevelNumber, Score};

/// `POST /api/game/progress`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlayerRequest {
    pub player_name: String,
}

impl CreatePlayerRequest {
    #[must_use]
    pub fn new(name: &PlayerName) -> Self {
        Self {
            player_name: name.as_str().to_string(),
        }
    }
}

/// `POST /api/game/complete-level`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCompletionRequest {
    pub player_id: String,
    pub level_number: u8,
    pub score: u8,
    /// Seconds spent in the level; sent as `null` when untimed.
    #[serde(default)]
    pub completion_time: Option<u32>,
}

impl LevelCompletionRequest {
    #[must_use]
    pub fn new(player_id: &str, event: CompletionEvent) -> Self {
        Self {
            player_id: player_id.to_string(),
            level_number: event.level.get(),
            score: event.score.get(),
            completion_time: event.completion_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionAck {
    pub message: String,
    pub new_total_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub total_score: u32,
    #[serde(default)]
    pub levels_completed: Vec<u8>,
}

/// Player record as it travels over the wire.
///
/// `level_scores` keys are stringified level numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecordDto {
    pub id: String,
    pub player_name: String,
    pub current_level: u8,
    #[serde(default)]
    pub levels_completed: Vec<u8>,
    #[serde(default)]
    pub total_score: u32,
    #[serde(default)]
    pub level_scores: BTreeMap<String, u8>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PlayerRecordDto {
    /// Wire form of `record`, without timestamps.
    #[must_use]
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            id: record.id.clone(),
            player_name: record.name.as_str().to_string(),
            current_level: record.current_level,
            levels_completed: record.levels_completed.iter().map(|l| l.get()).collect(),
            total_score: record.total_score,
            level_scores: record
                .level_scores
                .iter()
                .map(|(level, score)| (level.to_string(), score.get()))
                .collect(),
            achievements: record.achievements.iter().cloned().collect(),
            created_at: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn with_timestamps(
        mut self,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}

impl TryFrom<PlayerRecordDto> for PlayerRecord {
    type Error = ApiError;

    fn try_from(dto: PlayerRecordDto) -> Result<Self, Self::Error> {
        let name = PlayerName::parse(&dto.player_name)?;
        if dto.current_level == 0 {
            return Err(ApiError::Malformed("current_level must be at least 1".into()));
        }
        let levels_completed = dto
            .levels_completed
            .into_iter()
            .map(LevelNumber::try_from)
            .collect::<Result<BTreeSet<_>, _>>()?;
        let level_scores = dto
            .level_scores
            .into_iter()
            .map(|(key, score)| -> Result<(LevelNumber, Score), ApiError> {
                let level = key
                    .parse::<u8>()
                    .map_err(|_| ApiError::Malformed(format!("level key {key:?}")))
                    .and_then(|raw| LevelNumber::try_from(raw).map_err(ApiError::from))?;
                Ok((level, Score::try_from(score)?))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(Self {
            id: dto.id,
            name,
            current_level: dto.current_level,
            levels_completed,
            total_score: dto.total_score,
            level_scores,
            achievements: dto.achievements.into_iter().collect(),
        })
    }
}

/// The four calls the client makes against the progress service.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    /// Create a player, or return the existing record for a taken name.
    async fn create_player(
        &self,
        request: &CreatePlayerRequest,
    ) -> Result<PlayerRecordDto, ApiError>;

    /// Fetch by name; [`ApiError::NotFound`] when absent.
    async fn fetch_player(&self, name: &str) -> Result<PlayerRecordDto, ApiError>;

    async fn complete_level(
        &self,
        request: &LevelCompletionRequest,
    ) -> Result<CompletionAck, ApiError>;

    /// Top ten players by total score, descending.
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dto_parses_service_json() {
        let json = r#"{
            "id": "abc",
            "player_name": "Ana",
            "current_level": 2,
            "levels_completed": [1],
            "total_score": 100,
            "level_scores": { "1": 100 },
            "achievements": ["first_level", "high_scorer"],
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:05:00Z"
        }"#;
        let dto: PlayerRecordDto = serde_json::from_str(json).unwrap();
        assert!(dto.created_at.is_some());
        let record = PlayerRecord::try_from(dto).unwrap();
        assert_eq!(record.current_level, 2);
        assert_eq!(record.best_score(LevelNumber::CLEANUP), Score::PERFECT);
        assert!(record.has_achievement("high_scorer"));
    }

    #[test]
    fn bad_level_key_is_malformed() {
        let dto = PlayerRecordDto {
            id: "abc".into(),
            player_name: "Ana".into(),
            current_level: 1,
            levels_completed: vec![],
            total_score: 0,
            level_scores: BTreeMap::from([("nine".to_string(), 10)]),
            achievements: vec![],
            created_at: None,
            updated_at: None,
        };
        assert!(matches!(
            PlayerRecord::try_from(dto),
            Err(ApiError::Malformed(_))
        ));
    }

    #[test]
    fn completion_request_always_carries_time_key() {
        let event = CompletionEvent::new(LevelNumber::QUIZ, Score::PERFECT);
        let json = serde_json::to_value(LevelCompletionRequest::new("p", event)).unwrap();
        assert_eq!(json["level_number"], 5);
        assert_eq!(json.get("completion_time"), Some(&serde_json::Value::Null));
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["completion_time", "level_number", "player_id", "score"]
        );
    }
}
