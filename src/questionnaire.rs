//! Screening Questionnaire
//!
//! Flat key → string map sent alongside the ECG image. Numeric answers are
//! numeric strings, radio answers default to their first option, and
//! checkboxes hold either `""` or the field's sentinel label. The sentinel
//! labels are the values the backend expects and are sent verbatim.

use std::collections::BTreeMap;

/// Kind of input a field is rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number { placeholder: &'static str },
    /// Options as (wire value, display label)
    Radio { options: &'static [(&'static str, &'static str)] },
    /// Checked value sent for a ticked box
    Checkbox { sentinel: &'static str },
}

/// Which block of the form a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Basics,
    History,
    FamilyHistory,
    Lifestyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub group: FieldGroup,
}

impl Field {
    pub fn is_checkbox(&self) -> bool {
        matches!(self.kind, FieldKind::Checkbox { .. })
    }

    fn initial_value(&self) -> String {
        match self.kind {
            FieldKind::Radio { options } => options
                .first()
                .map(|(value, _)| value.to_string())
                .unwrap_or_default(),
            FieldKind::Number { .. } | FieldKind::Checkbox { .. } => String::new(),
        }
    }
}

const fn number(key: &'static str, label: &'static str, placeholder: &'static str) -> Field {
    Field {
        key,
        label,
        kind: FieldKind::Number { placeholder },
        group: FieldGroup::Basics,
    }
}

const fn checkbox(
    key: &'static str,
    label: &'static str,
    sentinel: &'static str,
    group: FieldGroup,
) -> Field {
    Field {
        key,
        label,
        kind: FieldKind::Checkbox { sentinel },
        group,
    }
}

const fn radio(
    key: &'static str,
    label: &'static str,
    options: &'static [(&'static str, &'static str)],
    group: FieldGroup,
) -> Field {
    Field {
        key,
        label,
        kind: FieldKind::Radio { options },
        group,
    }
}

/// Every questionnaire field, in form order
pub const FIELDS: [Field; 17] = [
    number("age", "Age (years)", "e.g. 45"),
    number("height", "Height (cm)", "e.g. 170"),
    number("weight", "Weight (kg)", "e.g. 60"),
    radio("gender", "Sex", &[("0", "Male"), ("1", "Female")], FieldGroup::Basics),
    checkbox("hx_stroke", "Stroke", "뇌졸중", FieldGroup::History),
    checkbox("hx_mi", "Myocardial infarction", "심근경색", FieldGroup::History),
    checkbox("hx_htn", "Hypertension", "고혈압", FieldGroup::History),
    checkbox("hx_dm", "Diabetes", "당뇨병", FieldGroup::History),
    checkbox("hx_dysli", "Dyslipidemia", "이상지질혈증", FieldGroup::History),
    checkbox("hx_athero", "Atherosclerosis", "중상경화증", FieldGroup::History),
    checkbox("fhx_stroke", "Stroke", "뇌졸중", FieldGroup::FamilyHistory),
    checkbox("fhx_mi", "Myocardial infarction", "심근경색", FieldGroup::FamilyHistory),
    checkbox("fhx_htn", "Hypertension", "고혈압", FieldGroup::FamilyHistory),
    checkbox("fhx_dm", "Diabetes", "당뇨병", FieldGroup::FamilyHistory),
    radio(
        "smoke",
        "Smoking",
        &[("0", "Never"), ("1", "Former"), ("2", "Current")],
        FieldGroup::Lifestyle,
    ),
    radio("alcohol", "Alcohol", &[("0", "No"), ("1", "Yes")], FieldGroup::Lifestyle),
    radio(
        "phy_act",
        "Physical activity",
        &[("0", "None"), ("1", "Light"), ("2", "Moderate"), ("3", "Vigorous")],
        FieldGroup::Lifestyle,
    ),
];

pub fn field(key: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|f| f.key == key)
}

pub fn fields_in(group: FieldGroup) -> impl Iterator<Item = &'static Field> {
    FIELDS.iter().filter(move |f| f.group == group)
}

/// Answers keyed by field key
#[derive(Debug, Clone, PartialEq)]
pub struct Questionnaire {
    answers: BTreeMap<String, String>,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new()
    }
}

impl Questionnaire {
    /// Fresh form: radios on their first option, everything else empty
    pub fn new() -> Self {
        let answers = FIELDS
            .iter()
            .map(|f| (f.key.to_string(), f.initial_value()))
            .collect();
        Self { answers }
    }

    pub fn get(&self, key: &str) -> &str {
        self.answers.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.answers.insert(key.to_string(), value.into());
    }

    /// Tick or untick a checkbox, storing its sentinel or `""`
    pub fn set_checked(&mut self, key: &str, checked: bool) {
        let value = match field(key).map(|f| f.kind) {
            Some(FieldKind::Checkbox { sentinel }) if checked => sentinel,
            _ if checked => "1",
            _ => "",
        };
        self.set(key, value);
    }

    pub fn is_checked(&self, key: &str) -> bool {
        !self.get(key).is_empty()
    }

    /// Required (non-checkbox) fields whose trimmed answer is empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        FIELDS
            .iter()
            .filter(|f| !f.is_checkbox() && self.get(f.key).trim().is_empty())
            .map(|f| f.key)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// JSON object text sent as the `questionnaire` multipart field
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.answers).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Questionnaire {
        let mut q = Questionnaire::new();
        q.set("age", "45");
        q.set("height", "170");
        q.set("weight", "60");
        q
    }

    #[test]
    fn test_defaults() {
        let q = Questionnaire::new();
        assert_eq!(q.get("gender"), "0");
        assert_eq!(q.get("phy_act"), "0");
        assert_eq!(q.get("hx_mi"), "");
        assert_eq!(q.missing_fields(), vec!["age", "height", "weight"]);
    }

    #[test]
    fn test_checkboxes_are_optional() {
        let q = complete();
        assert!(q.is_complete());
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut q = complete();
        q.set("weight", "   ");
        assert_eq!(q.missing_fields(), vec!["weight"]);
    }

    #[test]
    fn test_cleared_radio_is_missing() {
        let mut q = complete();
        q.set("smoke", "");
        assert_eq!(q.missing_fields(), vec!["smoke"]);
    }

    #[test]
    fn test_checkbox_sentinel() {
        let mut q = complete();
        q.set_checked("hx_htn", true);
        assert_eq!(q.get("hx_htn"), "고혈압");
        assert!(q.is_checked("hx_htn"));
        q.set_checked("hx_htn", false);
        assert!(!q.is_checked("hx_htn"));
    }

    #[test]
    fn test_json_contains_every_field() {
        let q = complete();
        let value: serde_json::Value = serde_json::from_str(&q.to_json()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), FIELDS.len());
        assert_eq!(object["age"], "45");
        assert_eq!(object["fhx_dm"], "");
    }

    #[test]
    fn test_groups() {
        assert_eq!(fields_in(FieldGroup::History).count(), 6);
        assert_eq!(fields_in(FieldGroup::FamilyHistory).count(), 4);
        assert_eq!(fields_in(FieldGroup::Lifestyle).count(), 3);
    }
}
