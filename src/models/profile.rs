use serde::{Deserialize, Serialize};

/// Optional user profile attached to an analysis run.
///
/// Every field is independently optional. Missing fields render as an
/// explicit "unknown" placeholder in generated prompts (never silently
/// omitted) so prompt shape stays stable across callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<String>,
    pub goals: Option<String>,
    pub dietary_restrictions: Option<String>,
}

impl UserProfile {
    /// True when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.sex.is_none()
            && self.weight_kg.is_none()
            && self.height_cm.is_none()
            && self.activity_level.is_none()
            && self.goals.is_none()
            && self.dietary_restrictions.is_none()
    }
}
