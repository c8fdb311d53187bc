//! Catalog of quiz entities.
//!
//! The catalog is loaded once from a JSON file and stays read-only for the
//! lifetime of every session that borrows it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Function key slot used to pick one of an entity's pose variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoseSlot {
    F1,
    F2,
    F3,
}

impl PoseSlot {
    pub const ALL: [PoseSlot; 3] = [PoseSlot::F1, PoseSlot::F2, PoseSlot::F3];

    pub fn index(self) -> usize {
        match self {
            PoseSlot::F1 => 0,
            PoseSlot::F2 => 1,
            PoseSlot::F3 => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// One depiction of an entity: an opaque frame for the graphic area and a
/// spoken label such as "sitting".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseVariant {
    pub frame: String,
    #[serde(default)]
    pub label: String,
}

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub poses: Vec<PoseVariant>,
}

impl Entity {
    pub fn pose(&self, slot: PoseSlot) -> Option<&PoseVariant> {
        self.poses.get(slot.index())
    }

    /// Whether the slot holds real frame content rather than a placeholder
    pub fn has_content(&self, slot: PoseSlot, min_len: usize) -> bool {
        self.pose(slot).is_some_and(|pose| pose.frame.chars().count() > min_len)
    }

    /// Slots whose frame exceeds the placeholder threshold, in slot order
    pub fn valid_slots(&self, min_len: usize) -> Vec<PoseSlot> {
        PoseSlot::ALL
            .into_iter()
            .filter(|slot| self.has_content(*slot, min_len))
            .collect()
    }

    /// An entity can be asked about when it has a name and at least one usable pose
    pub fn is_playable(&self, min_len: usize) -> bool {
        !self.name.is_empty() && !self.valid_slots(min_len).is_empty()
    }
}

/// Ordered entity list plus the label-to-braille table used for text frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub braille: HashMap<String, String>,
}

impl Catalog {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            braille: HashMap::new(),
        }
    }

    pub fn with_braille(mut self, braille: HashMap<String, String>) -> Self {
        self.braille = braille;
        self
    }

    /// Load a catalog from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog file: {}", path.as_ref().display()))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse catalog file: {}", path.as_ref().display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(content)?;
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Distinct non-empty categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for category in self.entities.iter().filter_map(|e| e.category.as_deref()) {
            if !category.is_empty() && !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }
        categories
    }

    /// Entities a session draws from: everything, or one category
    pub fn pool(&self, category: Option<&str>) -> Vec<&Entity> {
        match category {
            None => self.entities.iter().collect(),
            Some(category) => self
                .entities
                .iter()
                .filter(|e| e.category.as_deref() == Some(category))
                .collect(),
        }
    }

    /// Braille token for a label, if the table knows it
    pub fn braille_for(&self, label: &str) -> Option<&str> {
        self.braille.get(label).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str, category: Option<&str>, frames: &[&str]) -> Entity {
        Entity {
            name: name.to_string(),
            category: category.map(str::to_string),
            description: String::new(),
            poses: frames
                .iter()
                .enumerate()
                .map(|(i, frame)| PoseVariant {
                    frame: frame.to_string(),
                    label: format!("pose {}", i + 1),
                })
                .collect(),
        }
    }

    #[test]
    fn test_valid_slots_skip_placeholders() {
        let fox = entity("Fox", None, &["pose-content-aaaaaaaaaa", "short", "pose-content-bbbbbbbbbb"]);
        assert_eq!(fox.valid_slots(10), vec![PoseSlot::F1, PoseSlot::F3]);
        assert!(fox.is_playable(10));
        assert!(!fox.has_content(PoseSlot::F2, 10));
    }

    #[test]
    fn test_exactly_threshold_is_placeholder() {
        let owl = entity("Owl", None, &["0123456789"]);
        assert!(!owl.is_playable(10));
    }

    #[test]
    fn test_unnamed_entity_is_not_playable() {
        let nameless = entity("", None, &["pose-content-aaaaaaaaaa"]);
        assert!(!nameless.is_playable(10));
    }

    #[test]
    fn test_categories_and_pool() {
        let catalog = Catalog::new(vec![
            entity("Fox", Some("mammal"), &[]),
            entity("Owl", Some("bird"), &[]),
            entity("Wolf", Some("mammal"), &[]),
            entity("Mystery", None, &[]),
        ]);

        assert_eq!(catalog.categories(), vec!["mammal".to_string(), "bird".to_string()]);
        assert_eq!(catalog.pool(None).len(), 4);
        let mammals: Vec<&str> = catalog.pool(Some("mammal")).iter().map(|e| e.name.as_str()).collect();
        assert_eq!(mammals, vec!["Fox", "Wolf"]);
        assert!(catalog.pool(Some("fish")).is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "entities": [
                {"name": "Fox", "category": "mammal", "poses": [{"frame": "pose-content-aaaaaaaaaa", "label": "sitting"}]}
            ],
            "braille": {"Fox": "0b1c2d"}
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entities[0].poses[0].label, "sitting");
        assert_eq!(catalog.braille_for("Fox"), Some("0b1c2d"));
        assert_eq!(catalog.braille_for("Wolf"), None);
    }
}
