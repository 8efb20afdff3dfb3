//! Level 5: the closing quiz.
use serde::{Deserialize, Serialize};

use super::{LevelSimulator, LevelStatus, Notice};
use crate::data::{Question, QuizBank};
use crate::meter::MeterSnapshot;
use crate::numbers::ratio_pct;
use crate::score::{CompletionEvent, LevelNumber, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizAction {
    /// Choose option `index` for the current question.
    Answer(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSim {
    bank: QuizBank,
    current: usize,
    correct: u32,
    locked: bool,
    status: LevelStatus,
}

impl QuizSim {
    #[must_use]
    pub fn new(bank: QuizBank) -> Self {
        Self {
            bank,
            current: 0,
            correct: 0,
            locked: false,
            status: LevelStatus::Playing,
        }
    }

    /// The question on screen, `None` once the quiz is over.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.status.is_terminal() {
            return None;
        }
        self.bank.questions.get(self.current)
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub const fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub const fn is_answered(&self) -> bool {
        self.locked
    }

    fn total(&self) -> u32 {
        u32::try_from(self.bank.len()).unwrap_or(u32::MAX)
    }
}

impl LevelSimulator for QuizSim {
    type Action = QuizAction;

    fn number(&self) -> LevelNumber {
        LevelNumber::QUIZ
    }

    fn status(&self) -> LevelStatus {
        self.status
    }

    fn apply_action(&mut self, action: QuizAction) -> Vec<Notice> {
        if self.status.is_terminal() {
            return vec![Notice::LevelOver];
        }
        if self.locked {
            return vec![Notice::AlreadyAnswered];
        }
        let QuizAction::Answer(option) = action;
        let Some(question) = self.bank.questions.get(self.current) else {
            return vec![Notice::LevelOver];
        };
        if option >= question.options.len() {
            return vec![Notice::NoSuchTarget { index: option }];
        }
        self.locked = true;
        if option == question.correct {
            self.correct = self.correct.saturating_add(1);
            vec![Notice::CorrectAnswer]
        } else {
            vec![Notice::WrongAnswer {
                correct: question.correct,
            }]
        }
    }

    /// Move to the next question once the current one is answered.
    fn advance_turn(&mut self) -> Vec<Notice> {
        if self.status.is_terminal() {
            return vec![Notice::LevelOver];
        }
        if !self.locked {
            return vec![Notice::AnswerFirst];
        }
        self.locked = false;
        if self.current + 1 < self.bank.len() {
            self.current += 1;
            return Vec::new();
        }
        self.status = LevelStatus::Won;
        vec![Notice::QuizFinished {
            correct: self.correct,
            total: self.total(),
        }]
    }

    fn completion(&self) -> Option<CompletionEvent> {
        (self.status == LevelStatus::Won).then(|| {
            CompletionEvent::new(
                self.number(),
                Score::saturating(u32::from(ratio_pct(self.correct, self.total()))),
            )
        })
    }

    fn meters(&self) -> MeterSnapshot {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(answers: &[usize]) -> QuizSim {
        let mut sim = QuizSim::new(QuizBank::default_bank());
        for answer in answers {
            sim.apply_action(QuizAction::Answer(*answer));
            sim.advance_turn();
        }
        sim
    }

    #[test]
    fn all_correct_scores_perfect() {
        let sim = play(&[0, 1, 1, 2, 0]);
        assert_eq!(sim.status(), LevelStatus::Won);
        assert_eq!(sim.completion().map(|e| e.score), Some(Score::PERFECT));
    }

    #[test]
    fn three_of_five_scores_sixty() {
        let sim = play(&[0, 1, 1, 0, 1]);
        assert_eq!(sim.correct(), 3);
        assert_eq!(sim.completion().map(|e| e.score.get()), Some(60));
    }

    #[test]
    fn answer_locks_and_next_requires_answer() {
        let mut sim = QuizSim::new(QuizBank::default_bank());
        assert_eq!(sim.advance_turn(), vec![Notice::AnswerFirst]);
        assert_eq!(
            sim.apply_action(QuizAction::Answer(2)),
            vec![Notice::WrongAnswer { correct: 0 }]
        );
        assert_eq!(
            sim.apply_action(QuizAction::Answer(0)),
            vec![Notice::AlreadyAnswered]
        );
        assert_eq!(sim.correct(), 0);
        assert!(sim.advance_turn().is_empty());
        assert_eq!(sim.current_index(), 1);
        assert!(!sim.is_answered());
        assert_eq!(
            sim.apply_action(QuizAction::Answer(7)),
            vec![Notice::NoSuchTarget { index: 7 }]
        );
    }

    #[test]
    fn finished_quiz_is_inert() {
        let mut sim = play(&[0, 0, 0, 0, 0]);
        assert_eq!(sim.completion().map(|e| e.score.get()), Some(40));
        assert!(sim.current_question().is_none());
        assert_eq!(sim.apply_action(QuizAction::Answer(0)), vec![Notice::LevelOver]);
        assert_eq!(sim.advance_turn(), vec![Notice::LevelOver]);
    }
}
