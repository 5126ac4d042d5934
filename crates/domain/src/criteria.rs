//! Filter criteria and the rules for matching them against services.

use serde::{Deserialize, Serialize};

use crate::device_type::Interaction;
use crate::id::{AspectId, DeviceClassId, FunctionId};
use crate::taxonomy::TaxonomyIndex;

/// A conjunctive constraint on a service or one of its content-variable
/// paths. An empty field leaves that axis unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Serialized as `""` when unset.
    #[serde(with = "optional_interaction")]
    pub interaction: Option<Interaction>,
    pub function_id: FunctionId,
    pub device_class_id: DeviceClassId,
    pub aspect_id: AspectId,
}

impl FilterCriteria {
    /// Criterion that only constrains the function.
    #[must_use]
    pub fn function(function_id: impl Into<FunctionId>) -> Self {
        Self {
            function_id: function_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_aspect(mut self, aspect_id: impl Into<AspectId>) -> Self {
        self.aspect_id = aspect_id.into();
        self
    }

    #[must_use]
    pub fn with_device_class(mut self, device_class_id: impl Into<DeviceClassId>) -> Self {
        self.device_class_id = device_class_id.into();
        self
    }

    #[must_use]
    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = Some(interaction);
        self
    }

    /// A criterion without function and aspect is decided per service, not
    /// per content-variable path.
    #[must_use]
    pub fn is_service_level(&self) -> bool {
        self.function_id.is_empty() && self.aspect_id.is_empty()
    }

    /// Whether `candidate` satisfies every non-empty field of this criterion.
    /// The aspect axis also accepts descendants of the criterion's aspect.
    #[must_use]
    pub fn matches(&self, index: &TaxonomyIndex, candidate: &Candidate<'_>) -> bool {
        if self.interaction.is_some_and(|i| i != candidate.interaction) {
            return false;
        }
        if !self.device_class_id.is_empty() && self.device_class_id != *candidate.device_class_id {
            return false;
        }
        if !self.function_id.is_empty() && self.function_id != *candidate.function_id {
            return false;
        }
        self.aspect_id.is_empty() || index.aspect_matches(&self.aspect_id, candidate.aspect_id)
    }
}

/// What one service (and optionally one of its paths) offers.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub interaction: Interaction,
    pub device_class_id: &'a DeviceClassId,
    pub function_id: &'a FunctionId,
    pub aspect_id: &'a AspectId,
}

/// How per-criterion results combine into a service decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Every criterion must be satisfied, possibly by different paths.
    All,
    /// One satisfied criterion is enough.
    #[default]
    Any,
}

impl MatchMode {
    /// `true` selects [`MatchMode::All`].
    #[must_use]
    pub fn from_must_match_all(must_match_all: bool) -> Self {
        if must_match_all { Self::All } else { Self::Any }
    }

    /// Combine per-criterion results. No criteria means no constraint.
    #[must_use]
    pub fn accepts(self, satisfied: &[bool]) -> bool {
        if satisfied.is_empty() {
            return true;
        }
        match self {
            Self::All => satisfied.iter().all(|s| *s),
            Self::Any => satisfied.iter().any(|s| *s),
        }
    }
}

mod optional_interaction {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::device_type::Interaction;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<Interaction>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(interaction) => interaction.serialize(serializer),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Interaction>, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::aspect;

    fn index() -> TaxonomyIndex {
        TaxonomyIndex::builder()
            .aspects([aspect(
                "root",
                vec![aspect("child1", vec![aspect("grandchild", vec![])])],
            )])
            .build()
            .unwrap()
    }

    fn candidate<'a>(
        function_id: &'a FunctionId,
        aspect_id: &'a AspectId,
        device_class_id: &'a DeviceClassId,
    ) -> Candidate<'a> {
        Candidate {
            interaction: Interaction::Request,
            device_class_id,
            function_id,
            aspect_id,
        }
    }

    #[test]
    fn should_match_descendant_aspect_when_criterion_names_parent() {
        let index = index();
        let (f, a, c) = (
            FunctionId::from("getX"),
            AspectId::from("grandchild"),
            DeviceClassId::default(),
        );
        let criterion = FilterCriteria::default().with_aspect("child1");
        assert!(criterion.matches(&index, &candidate(&f, &a, &c)));

        let narrower = FilterCriteria::default().with_aspect("grandchild");
        let parent_aspect = AspectId::from("child1");
        assert!(!narrower.matches(&index, &candidate(&f, &parent_aspect, &c)));
    }

    #[test]
    fn should_require_every_non_empty_field() {
        let index = index();
        let (f, a, c) = (
            FunctionId::from("getX"),
            AspectId::from("root"),
            DeviceClassId::from("sensor"),
        );
        let c = candidate(&f, &a, &c);
        assert!(FilterCriteria::default().matches(&index, &c));
        assert!(FilterCriteria::function("getX").with_device_class("sensor").matches(&index, &c));
        assert!(!FilterCriteria::function("getY").matches(&index, &c));
        assert!(!FilterCriteria::default().with_device_class("lamp").matches(&index, &c));
        assert!(
            !FilterCriteria::default()
                .with_interaction(Interaction::Event)
                .matches(&index, &c)
        );
    }

    #[test]
    fn should_accept_any_candidate_when_criteria_list_is_empty() {
        assert!(MatchMode::All.accepts(&[]));
        assert!(MatchMode::Any.accepts(&[]));
        assert!(!MatchMode::All.accepts(&[true, false]));
        assert!(MatchMode::Any.accepts(&[false, true]));
    }

    #[test]
    fn should_deserialize_empty_interaction_as_unset() {
        let criteria: FilterCriteria = serde_json::from_value(serde_json::json!({
            "interaction": "",
            "function_id": "getX"
        }))
        .unwrap();
        assert_eq!(criteria.interaction, None);
        assert!(!criteria.is_service_level());

        let json = serde_json::to_value(FilterCriteria::default()).unwrap();
        assert_eq!(json["interaction"], "");
    }

    #[test]
    fn should_reject_unknown_interaction() {
        let result = serde_json::from_value::<FilterCriteria>(serde_json::json!({
            "interaction": "poll"
        }));
        assert!(result.is_err());
    }
}
