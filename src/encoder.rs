//! Derives the two device payloads from controller state.
//!
//! Stateless: the host calls [`encode`] after every state change and compares
//! the result with what it sent last.

use crate::catalog::Catalog;
use crate::constants::BLANK_BRAILLE_TOKEN;
use crate::quiz::feedback::pose_labels;
use crate::quiz::{Mode, SessionController};

/// Payloads for the graphic area and the braille text line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frames {
    pub graphic: String,
    pub text: String,
}

impl Frames {
    pub fn is_empty(&self) -> bool {
        self.graphic.is_empty() && self.text.is_empty()
    }
}

/// Concatenate the braille token of each item; unknown items become blank cells
pub fn text_frame<S: AsRef<str>>(catalog: &Catalog, items: &[S]) -> String {
    items
        .iter()
        .map(|item| catalog.braille_for(item.as_ref()).unwrap_or(BLANK_BRAILLE_TOKEN))
        .collect()
}

pub fn encode(controller: &SessionController) -> Frames {
    let catalog = controller.catalog();
    match controller.mode() {
        Mode::Menu => Frames::default(),
        Mode::Quiz(session) => {
            let current = &session.current;
            let graphic = current
                .entity
                .pose(current.displayed_pose)
                .map(|pose| pose.frame.clone())
                .unwrap_or_default();
            let text = if current.answered {
                text_frame(catalog, &pose_labels(&current.entity, controller.min_pose_content_len()))
            } else {
                text_frame(catalog, &current.options)
            };
            Frames { graphic, text }
        }
        Mode::Browse(state) => match catalog.get(state.index) {
            Some(entity) => Frames {
                graphic: entity.pose(state.slot).map(|pose| pose.frame.clone()).unwrap_or_default(),
                text: text_frame(catalog, std::slice::from_ref(&entity.name)),
            },
            None => Frames::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Entity, PoseSlot, PoseVariant};
    use crate::config::Config;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn catalog() -> Catalog {
        let entity = |name: &str, frame: &str| Entity {
            name: name.to_string(),
            category: None,
            description: String::new(),
            poses: vec![PoseVariant {
                frame: frame.to_string(),
                label: "sitting".to_string(),
            }],
        };
        let braille = HashMap::from([
            ("Fox".to_string(), "0a0b0c".to_string()),
            ("Wolf".to_string(), "1a1b1c".to_string()),
            ("Bear".to_string(), "2a2b2c".to_string()),
            ("sitting".to_string(), "3a3b3c".to_string()),
        ]);
        Catalog::new(vec![
            entity("Fox", "fox-frame-0123456789"),
            entity("Wolf", "wolf-frame-0123456789"),
            entity("Bear", "bear-frame-0123456789"),
        ])
        .with_braille(braille)
    }

    #[test]
    fn test_unknown_labels_become_blank() {
        let catalog = catalog();
        assert_eq!(text_frame(&catalog, &["Fox", "Owl"][..]), "0a0b0c000000");
    }

    #[test]
    fn test_menu_has_no_frames() {
        let controller = SessionController::new(Arc::new(catalog()), &Config::default());
        assert!(encode(&controller).is_empty());
    }

    #[test]
    fn test_quiz_frames_follow_answer_state() {
        let mut controller =
            SessionController::with_rng(Arc::new(catalog()), &Config::default(), StdRng::seed_from_u64(5));
        controller.start_session(None).unwrap();

        let current = controller.current().unwrap().clone();
        let frames = encode(&controller);
        assert_eq!(frames.graphic, current.entity.poses[0].frame);
        assert_eq!(frames.text.len(), 18);
        let expected: String = current
            .options
            .iter()
            .map(|o| controller.catalog().braille_for(o).unwrap())
            .collect();
        assert_eq!(frames.text, expected);

        controller.submit_answer(&current.entity.name);
        let frames = encode(&controller);
        assert_eq!(frames.text, "3a3b3c000000000000");
    }

    #[test]
    fn test_browse_frames_follow_entry_and_pose() {
        let pose = |frame: &str, label: &str| PoseVariant {
            frame: frame.to_string(),
            label: label.to_string(),
        };
        let fox = Entity {
            name: "Fox".to_string(),
            category: None,
            description: String::new(),
            poses: vec![pose("fox-sitting-0123456789", "sitting"), pose("fox-running-0123456789", "running")],
        };
        let wolf = Entity {
            name: "Wolf".to_string(),
            category: None,
            description: String::new(),
            poses: vec![pose("wolf-howling-0123456789", "howling")],
        };
        let braille = HashMap::from([
            ("Fox".to_string(), "0a0b0c".to_string()),
            ("Wolf".to_string(), "1a1b1c".to_string()),
        ]);
        let catalog = Catalog::new(vec![fox, wolf]).with_braille(braille);
        let mut controller = SessionController::new(Arc::new(catalog), &Config::default());

        controller.start_browse().unwrap();
        let frames = encode(&controller);
        assert_eq!(frames.graphic, "fox-sitting-0123456789");
        assert_eq!(frames.text, "0a0b0c");

        controller.switch_pose_variant(PoseSlot::F2);
        let frames = encode(&controller);
        assert_eq!(frames.graphic, "fox-running-0123456789");
        assert_eq!(frames.text, "0a0b0c");

        // Wraps from the first entry to the last
        controller.go_back();
        let frames = encode(&controller);
        assert_eq!(frames.graphic, "wolf-howling-0123456789");
        assert_eq!(frames.text, "1a1b1c");
    }
}
