//! Spoken feedback phrases.

use crate::catalog::{Entity, PoseSlot};
use crate::constants::{
    ORDINALS, POSE_LABEL_NONE, PROMPT_BACK_HINT, PROMPT_BROWSE_HINT, PROMPT_CORRECT, PROMPT_NEXT_HINT,
    PROMPT_POSE_HINT, PROMPT_QUESTION, PROMPT_TRY_AGAIN, PROMPT_WRONG,
};

/// "first: X, second: Y, third: Z"
pub fn enumerate<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match ORDINALS.get(i) {
            Some(ordinal) => format!("{}: {}", ordinal, item.as_ref()),
            None => format!("{}: {}", i + 1, item.as_ref()),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Label for every pose slot, with "none" where the slot has no usable frame
pub fn pose_labels(entity: &Entity, min_len: usize) -> Vec<String> {
    PoseSlot::ALL
        .into_iter()
        .map(|slot| match entity.pose(slot) {
            Some(pose) if entity.has_content(slot, min_len) && !pose.label.is_empty() => pose.label.clone(),
            _ => POSE_LABEL_NONE.to_string(),
        })
        .collect()
}

fn with_hint(text: String, hint: Option<&str>) -> String {
    match hint {
        Some(hint) => format!("{} {}", text, hint),
        None => text,
    }
}

fn back_hint(show: bool) -> Option<&'static str> {
    show.then_some(PROMPT_BACK_HINT)
}

/// Prompt read out when a question appears
pub fn question_prompt(options: &[String], show_back_hint: bool) -> String {
    with_hint(
        format!("{} {}.", PROMPT_QUESTION, enumerate(options)),
        back_hint(show_back_hint),
    )
}

/// Feedback after the correct option was chosen
pub fn correct_answer(entity: &Entity, min_len: usize) -> String {
    format!(
        "{} {}. {} {}. {}",
        PROMPT_CORRECT,
        entity.name,
        PROMPT_POSE_HINT,
        enumerate(&pose_labels(entity, min_len)),
        PROMPT_NEXT_HINT
    )
}

/// Feedback after a wrong option was chosen; the options are read out again
pub fn wrong_answer(selected: &str, options: &[String], show_back_hint: bool) -> String {
    with_hint(
        format!(
            "{} {} {} {}.",
            selected,
            PROMPT_WRONG,
            PROMPT_TRY_AGAIN,
            enumerate(options)
        ),
        back_hint(show_back_hint),
    )
}

/// Description read out while browsing the catalog
pub fn browse_entry(entity: &Entity, slot: PoseSlot) -> String {
    let label = entity
        .pose(slot)
        .map(|pose| pose.label.as_str())
        .filter(|label| !label.is_empty())
        .unwrap_or(POSE_LABEL_NONE);

    let mut text = format!("{}, {}.", entity.name, label);
    if !entity.description.is_empty() {
        text.push(' ');
        text.push_str(&entity.description);
    }
    text.push(' ');
    text.push_str(PROMPT_BROWSE_HINT);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PoseVariant;

    fn fox() -> Entity {
        Entity {
            name: "Fox".to_string(),
            category: None,
            description: "A small wild canine.".to_string(),
            poses: vec![
                PoseVariant {
                    frame: "pose-content-aaaaaaaaaa".to_string(),
                    label: "sitting".to_string(),
                },
                PoseVariant {
                    frame: "tiny".to_string(),
                    label: "running".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_enumerate_uses_spoken_ordinals() {
        let options = vec!["Fox".to_string(), "Wolf".to_string(), "Bear".to_string()];
        assert_eq!(enumerate(&options), "first: Fox, second: Wolf, third: Bear");
    }

    #[test]
    fn test_question_prompt_hint() {
        let options = vec!["Fox".to_string(), "Wolf".to_string(), "Bear".to_string()];
        let first = question_prompt(&options, false);
        assert!(!first.contains(PROMPT_BACK_HINT));
        assert!(first.ends_with("third: Bear."));
        assert!(question_prompt(&options, true).ends_with(PROMPT_BACK_HINT));
    }

    #[test]
    fn test_pose_labels_render_placeholders_as_none() {
        assert_eq!(pose_labels(&fox(), 10), vec!["sitting", "none", "none"]);
    }

    #[test]
    fn test_correct_answer_lists_poses() {
        let text = correct_answer(&fox(), 10);
        assert!(text.starts_with("Correct! Fox."));
        assert!(text.contains("first: sitting, second: none, third: none"));
    }

    #[test]
    fn test_wrong_answer_repeats_options() {
        let options = vec!["Fox".to_string(), "Wolf".to_string(), "Bear".to_string()];
        let text = wrong_answer("Wolf", &options, false);
        assert_eq!(
            text,
            format!("Wolf {} {} first: Fox, second: Wolf, third: Bear.", PROMPT_WRONG, PROMPT_TRY_AGAIN)
        );
        assert!(wrong_answer("Wolf", &options, true).ends_with(PROMPT_BACK_HINT));
    }

    #[test]
    fn test_browse_entry_reads_description() {
        let text = browse_entry(&fox(), PoseSlot::F1);
        assert!(text.starts_with("Fox, sitting. A small wild canine."));
    }
}
