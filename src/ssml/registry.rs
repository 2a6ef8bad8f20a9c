use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::EditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeKind {
    /// One of `choices`, nothing else.
    Choice,
    /// A label from `choices`, or a free numeric value such as `120%` or `-3dB`.
    ChoiceOrNumeric,
    Text,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub kind: AttributeKind,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub choices: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<NumericRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub label_values: &'static [(&'static str, i32)],
}

#[derive(Debug, Clone, Serialize)]
pub struct TagDefinition {
    pub name: &'static str,
    /// Self-closing element (`<break .../>`): it marks a position, not a span.
    pub empty: bool,
    pub attributes: Vec<AttributeSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagRegistry {
    tags: Vec<TagDefinition>,
}

lazy_static! {
    static ref STANDARD: TagRegistry = TagRegistry::new(standard_tags());
    static ref NUMERIC_VALUE: Regex =
        Regex::new(r"^[+-]?\d+(\.\d+)?\s*(%|[A-Za-z]+)?$").unwrap();
}

impl TagRegistry {
    pub fn new(tags: Vec<TagDefinition>) -> Self {
        Self { tags }
    }

    /// The process-wide registry of supported SSML tags.
    pub fn standard() -> &'static TagRegistry {
        &STANDARD
    }

    pub fn lookup(&self, name: &str) -> Option<&TagDefinition> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn tags(&self) -> &[TagDefinition] {
        &self.tags
    }
}

impl TagDefinition {
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn validate(&self, name: &str, value: &str) -> Result<(), EditError> {
        let invalid = |reason: String| EditError::InvalidAttribute {
            tag: self.name.to_string(),
            attribute: name.to_string(),
            reason,
        };

        let spec = self
            .attribute(name)
            .ok_or_else(|| invalid("unknown attribute".to_string()))?;

        if value.contains(['"', '<', '>']) {
            return Err(invalid("quotes and angle brackets are not allowed".to_string()));
        }

        if spec.accepts(value) {
            Ok(())
        } else {
            Err(invalid(format!("{:?} is not accepted", value)))
        }
    }
}

impl AttributeSpec {
    pub fn accepts(&self, value: &str) -> bool {
        match self.kind {
            AttributeKind::Choice => self.choices.contains(&value),
            AttributeKind::ChoiceOrNumeric => {
                self.choices.contains(&value) || NUMERIC_VALUE.is_match(value)
            }
            AttributeKind::Numeric => NUMERIC_VALUE.is_match(value),
            AttributeKind::Text => true,
        }
    }

    pub fn label_value(&self, label: &str) -> Option<i32> {
        self.label_values
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| *v)
    }

    /// Label whose mapped number is closest to `value`. On equal distance the
    /// label listed first wins.
    pub fn nearest_label(&self, value: f64) -> Option<&'static str> {
        let mut best: Option<(&'static str, f64)> = None;
        for &(label, mapped) in self.label_values {
            let distance = (f64::from(mapped) - value).abs();
            match best {
                Some((_, d)) if distance >= d => {}
                _ => best = Some((label, distance)),
            }
        }
        best.map(|(label, _)| label)
    }

    /// Attribute text for a value picked on a continuous control.
    pub fn resolve_numeric(&self, value: f64) -> String {
        if self.kind == AttributeKind::ChoiceOrNumeric {
            if let Some(label) = self.nearest_label(value) {
                return label.to_string();
            }
        }
        format!("{}{}", value, self.unit.unwrap_or(""))
    }
}

fn standard_tags() -> Vec<TagDefinition> {
    vec![
        TagDefinition {
            name: "prosody",
            empty: false,
            attributes: vec![
                slider(
                    "rate",
                    &["x-slow", "slow", "medium", "fast", "x-fast"],
                    NumericRange { min: 50, max: 200, step: 10 },
                    "%",
                    &[
                        ("x-slow", 50),
                        ("slow", 75),
                        ("medium", 100),
                        ("fast", 150),
                        ("x-fast", 200),
                    ],
                ),
                slider(
                    "pitch",
                    &["x-low", "low", "medium", "high", "x-high"],
                    NumericRange { min: -100, max: 100, step: 10 },
                    "Hz",
                    &[
                        ("x-low", -100),
                        ("low", -50),
                        ("medium", 0),
                        ("high", 50),
                        ("x-high", 100),
                    ],
                ),
                slider(
                    "volume",
                    &["silent", "x-soft", "soft", "medium", "loud", "x-loud"],
                    NumericRange { min: -6, max: 6, step: 1 },
                    "dB",
                    &[
                        ("silent", -6),
                        ("x-soft", -3),
                        ("soft", -1),
                        ("medium", 0),
                        ("loud", 3),
                        ("x-loud", 6),
                    ],
                ),
            ],
        },
        TagDefinition {
            name: "emphasis",
            empty: false,
            attributes: vec![choice("level", &["strong", "moderate", "reduced"])],
        },
        TagDefinition {
            name: "break",
            empty: true,
            attributes: vec![
                AttributeSpec {
                    name: "time",
                    kind: AttributeKind::Numeric,
                    choices: &[],
                    range: None,
                    unit: Some("ms"),
                    label_values: &[],
                },
                choice(
                    "strength",
                    &["none", "x-weak", "weak", "medium", "strong", "x-strong"],
                ),
            ],
        },
        TagDefinition {
            name: "say-as",
            empty: false,
            attributes: vec![choice(
                "interpret-as",
                &[
                    "characters",
                    "spell-out",
                    "cardinal",
                    "ordinal",
                    "fraction",
                    "unit",
                    "date",
                    "time",
                    "telephone",
                    "address",
                ],
            )],
        },
        TagDefinition {
            name: "sub",
            empty: false,
            attributes: vec![text("alias")],
        },
        TagDefinition {
            name: "phoneme",
            empty: false,
            attributes: vec![choice("alphabet", &["ipa", "x-sampa"]), text("ph")],
        },
    ]
}

fn choice(name: &'static str, choices: &'static [&'static str]) -> AttributeSpec {
    AttributeSpec {
        name,
        kind: AttributeKind::Choice,
        choices,
        range: None,
        unit: None,
        label_values: &[],
    }
}

fn text(name: &'static str) -> AttributeSpec {
    AttributeSpec {
        name,
        kind: AttributeKind::Text,
        choices: &[],
        range: None,
        unit: None,
        label_values: &[],
    }
}

fn slider(
    name: &'static str,
    choices: &'static [&'static str],
    range: NumericRange,
    unit: &'static str,
    label_values: &'static [(&'static str, i32)],
) -> AttributeSpec {
    AttributeSpec {
        name,
        kind: AttributeKind::ChoiceOrNumeric,
        choices,
        range: Some(range),
        unit: Some(unit),
        label_values,
    }
}
