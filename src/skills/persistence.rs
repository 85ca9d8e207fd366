//! Persisted form of a skill.
//!
//! Only the configuration survives a round trip: the enabled flag and the
//! name. Lifecycle state and queued requests are runtime-only, so a restored
//! skill always starts `Inactive` with an empty queue.
//!
//! ```json
//! { "type": "FunctionSkill", "enabled": true, "skillName": "say_hello" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::base::SkillCore;
use super::skill::Skill;
use crate::error::{SkillError, SkillResult};

/// The persisted attributes of a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// Concrete capability type that wrote the record.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub skill_type: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(rename = "skillName", default)]
    pub skill_name: String,
}

fn default_enabled() -> bool {
    true
}

impl Default for SkillRecord {
    fn default() -> Self {
        Self {
            skill_type: None,
            enabled: true,
            skill_name: String::new(),
        }
    }
}

impl SkillRecord {
    /// Parse a record. Unknown fields are ignored; missing ones default.
    pub fn from_json(value: &Value) -> SkillResult<Self> {
        if !value.is_object() {
            return Err(SkillError::InvalidRecord(format!(
                "expected a JSON object, got {}",
                value
            )));
        }
        Ok(Self::deserialize(value)?)
    }

    /// The record as a JSON object.
    pub fn to_json(&self) -> SkillResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl SkillCore {
    /// Snapshot of the persisted attributes (without a type tag).
    pub fn to_record(&self) -> SkillRecord {
        SkillRecord {
            skill_type: None,
            enabled: self.is_enabled(),
            skill_name: self.name(),
        }
    }

    /// Apply persisted attributes. Outstanding requests are dropped without
    /// callbacks and the lifecycle returns to `Inactive`.
    pub fn apply_record(&self, record: &SkillRecord) {
        self.abort_all();
        self.set_enabled(record.enabled);
        self.set_name(&record.skill_name);
    }
}

/// Serialize a skill's persisted attributes and extras.
pub fn serialize_skill<S: Skill + ?Sized>(skill: &S) -> Value {
    let mut record = Map::new();
    record.insert(
        "type".to_string(),
        Value::String(skill.skill_type().to_string()),
    );
    record.insert("enabled".to_string(), Value::Bool(skill.is_enabled()));
    record.insert("skillName".to_string(), Value::String(skill.skill_name()));
    skill.write_extra(&mut record);
    Value::Object(record)
}

/// Restore a skill's persisted attributes and extras.
///
/// A record tagged with a different capability type is rejected without
/// touching the skill.
pub fn deserialize_skill<S: Skill + ?Sized>(skill: &S, value: &Value) -> SkillResult<()> {
    let record = SkillRecord::from_json(value)?;
    if let Some(tag) = record.skill_type.as_deref() {
        if tag != skill.skill_type() {
            return Err(SkillError::InvalidRecord(format!(
                "record is for '{}', not '{}'",
                tag,
                skill.skill_type()
            )));
        }
    }

    skill.core().apply_record(&record);
    if let Value::Object(map) = value {
        skill.read_extra(map)?;
    }

    log::debug!(
        "skill {} restored: name='{}', enabled={}",
        skill.id(),
        record.skill_name,
        record.enabled
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::skills::request::{ParamsMap, SkillDelegate};
    use crate::skills::state::SkillState;
    use crate::skills::testing::probe_skill;

    #[test]
    fn test_record_defaults() {
        let record = SkillRecord::from_json(&json!({})).unwrap();
        assert_eq!(record, SkillRecord::default());
        assert!(record.enabled);
        assert_eq!(record.skill_name, "");
    }

    #[test]
    fn test_record_ignores_unknown_fields() {
        let record =
            SkillRecord::from_json(&json!({"skillName": "nod", "m_Unknown": [1, 2]})).unwrap();
        assert_eq!(record.skill_name, "nod");
    }

    #[test]
    fn test_record_rejects_non_object() {
        let err = SkillRecord::from_json(&json!([true])).unwrap_err();
        assert!(matches!(err, SkillError::InvalidRecord(_)));

        let err = SkillRecord::from_json(&json!({"enabled": "yes"})).unwrap_err();
        assert!(matches!(err, SkillError::Record(_)));
    }

    #[test]
    fn test_record_field_names() {
        let record = SkillRecord {
            skill_type: None,
            enabled: false,
            skill_name: "look".to_string(),
        };
        assert_eq!(
            record.to_json().unwrap(),
            json!({"enabled": false, "skillName": "look"})
        );
    }

    #[test]
    fn test_round_trip_preserves_attributes_not_state() {
        let source = probe_skill();
        source.set_skill_name("point_at");
        source.set_enabled(false);
        source
            .core()
            .admit(SkillDelegate::empty(), ParamsMap::new());
        assert_eq!(source.state(), SkillState::Active);

        let json = source.to_json();
        assert_eq!(json["type"], json!("ProbeSkill"));
        assert_eq!(json["skillName"], json!("point_at"));
        assert_eq!(json["enabled"], json!(false));
        assert!(json.get("state").is_none());

        let restored = probe_skill();
        restored.load_json(&json).unwrap();
        assert_eq!(restored.skill_name(), "point_at");
        assert!(!restored.is_enabled());
        assert_eq!(restored.state(), SkillState::Inactive);
        assert!(!restored.core().have_requests());
    }

    #[test]
    fn test_load_resets_live_instance() {
        let skill = probe_skill();
        skill.core().admit(SkillDelegate::new(|_| panic!("must not fire")), ParamsMap::new());

        skill.load_json(&json!({"skillName": "fresh"})).unwrap();
        assert_eq!(skill.state(), SkillState::Inactive);
        assert_eq!(skill.core().pending_count(), 0);
        assert!(skill.is_enabled());
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let skill = probe_skill();
        skill.set_skill_name("keep");
        let err = skill
            .load_json(&json!({"type": "SpeechSkill", "skillName": "other"}))
            .unwrap_err();
        assert!(matches!(err, SkillError::InvalidRecord(_)));
        assert_eq!(skill.skill_name(), "keep");
    }

    #[test]
    fn test_core_record() {
        let skill = probe_skill();
        skill.set_skill_name("blink");
        let record = skill.core().to_record();
        assert_eq!(record.skill_name, "blink");
        assert!(record.enabled);
        assert!(record.skill_type.is_none());
    }
}
