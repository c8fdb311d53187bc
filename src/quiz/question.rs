//! Question records and the generator that draws them from a pool.

use super::feedback;
use crate::catalog::{Entity, PoseSlot};
use crate::constants::OPTION_COUNT;
use crate::error::QuizError;
use rand::seq::SliceRandom;
use rand::Rng;

/// State of one quiz question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub entity: Entity,
    /// Exactly three distinct names in random order, one of them the entity's
    pub options: Vec<String>,
    pub displayed_pose: PoseSlot,
    pub answered: bool,
    pub correct: bool,
    pub feedback_text: String,
    pub sequence_number: u32,
}

impl QuestionRecord {
    pub fn correct_name(&self) -> &str {
        &self.entity.name
    }

    /// Solved questions are the only ones kept for back-navigation
    pub fn is_solved(&self) -> bool {
        self.answered && self.correct
    }
}

/// Draws new questions.
#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    min_pose_content_len: usize,
}

impl QuestionGenerator {
    pub fn new(min_pose_content_len: usize) -> Self {
        Self { min_pose_content_len }
    }

    pub fn min_pose_content_len(&self) -> usize {
        self.min_pose_content_len
    }

    /// Generate a question from `pool`.
    ///
    /// The correct entity is drawn among entities with a name and usable pose
    /// content; distractors are drawn from every name in the pool. The back
    /// hint is omitted for sequence number 1, the first question of a session.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        pool: &[&Entity],
        category: Option<&str>,
        sequence_number: u32,
        rng: &mut R,
    ) -> Result<QuestionRecord, QuizError> {
        let min_len = self.min_pose_content_len;
        let playable: Vec<&Entity> = pool.iter().copied().filter(|e| e.is_playable(min_len)).collect();
        if playable.is_empty() {
            return Err(QuizError::EmptyPool {
                category: category.map(str::to_string),
            });
        }

        let names: Vec<&str> = pool.iter().map(|e| e.name.as_str()).filter(|n| !n.is_empty()).collect();
        let mut distinct = names.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < OPTION_COUNT {
            return Err(QuizError::NotEnoughOptions { found: distinct.len() });
        }

        let entity = playable[rng.gen_range(0..playable.len())];
        let options = self.draw_options(&entity.name, &names, rng);

        let slots = entity.valid_slots(min_len);
        let displayed_pose = slots[rng.gen_range(0..slots.len())];

        Ok(QuestionRecord {
            entity: entity.clone(),
            feedback_text: feedback::question_prompt(&options, sequence_number > 1),
            options,
            displayed_pose,
            answered: false,
            correct: false,
            sequence_number,
        })
    }

    fn draw_options<R: Rng + ?Sized>(&self, correct: &str, names: &[&str], rng: &mut R) -> Vec<String> {
        let mut options = vec![correct.to_string()];
        while options.len() < OPTION_COUNT {
            let candidate = names[rng.gen_range(0..names.len())];
            if !options.iter().any(|o| o == candidate) {
                options.push(candidate.to_string());
            }
        }
        options.shuffle(rng);
        options
    }
}
