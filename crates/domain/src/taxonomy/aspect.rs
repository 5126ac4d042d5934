//! Aspects and their precomputed forest nodes.

use serde::{Deserialize, Serialize};

use crate::id::AspectId;

/// An aspect as stored by the repository: a tree of sub-aspects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspect {
    pub id: AspectId,
    pub name: String,
    #[serde(default)]
    pub sub_aspects: Vec<Aspect>,
}

/// One aspect within the forest, with its transitive closures precomputed.
///
/// `ancestor_ids` is ordered nearest-first (parent, grandparent, …, root);
/// `descendent_ids` is in pre-order. A root has an empty `parent_id` and
/// `root_id == id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectNode {
    pub id: AspectId,
    pub name: String,
    pub root_id: AspectId,
    #[serde(default)]
    pub parent_id: AspectId,
    #[serde(default)]
    pub child_ids: Vec<AspectId>,
    #[serde(default)]
    pub ancestor_ids: Vec<AspectId>,
    #[serde(default)]
    pub descendent_ids: Vec<AspectId>,
}

impl AspectNode {
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_empty()
    }

    /// Whether `other` is this node or one of its ancestors.
    #[must_use]
    pub fn is_self_or_descendant_of(&self, other: &AspectId) -> bool {
        self.id == *other || self.ancestor_ids.contains(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_aspect_without_sub_aspects() {
        let aspect: Aspect = serde_json::from_value(serde_json::json!({
            "id": "air",
            "name": "Air"
        }))
        .unwrap();
        assert!(aspect.sub_aspects.is_empty());
    }

    #[test]
    fn should_recognize_self_and_ancestors() {
        let node = AspectNode {
            id: AspectId::from("inside_air"),
            root_id: AspectId::from("air"),
            parent_id: AspectId::from("air"),
            ancestor_ids: vec![AspectId::from("air")],
            ..AspectNode::default()
        };
        assert!(!node.is_root());
        assert!(node.is_self_or_descendant_of(&AspectId::from("inside_air")));
        assert!(node.is_self_or_descendant_of(&AspectId::from("air")));
        assert!(!node.is_self_or_descendant_of(&AspectId::from("water")));
    }
}
