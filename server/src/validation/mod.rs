//! Declarative input schemas.
//!
//! A [`Schema`] is plain data: an ordered list of [`FieldRule`]s, each naming a
//! field, whether it must be present and the [`Constraint`] its value must meet.
//! Validation evaluates every rule and reports every violation, then rejects
//! any key the schema does not name.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use serde_json::{Map, Value};

pub mod schemas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Any non-empty string.
    Text,
    /// A string drawn from a closed set.
    OneOf(&'static [&'static str]),
    /// An ISO 8601 date or date-time, normalized to UTC.
    IsoDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub presence: Presence,
    pub constraint: Constraint,
}

impl FieldRule {
    pub const fn required(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            presence: Presence::Required,
            constraint,
        }
    }

    pub const fn optional(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            presence: Presence::Optional,
            constraint,
        }
    }

    /// Checks one present value, returning its normalized form.
    fn check(&self, value: &Value) -> Result<Value, String> {
        match self.constraint {
            Constraint::Text => match value {
                Value::String(s) if s.is_empty() => {
                    Err(format!("\"{}\" is not allowed to be empty", self.name))
                }
                Value::String(_) => Ok(value.clone()),
                _ => Err(format!("\"{}\" must be a string", self.name)),
            },
            Constraint::OneOf(allowed) => match value {
                Value::String(s) if allowed.contains(&s.as_str()) => Ok(value.clone()),
                Value::String(_) => Err(format!(
                    "\"{}\" must be one of [{}]",
                    self.name,
                    allowed.join(", ")
                )),
                _ => Err(format!("\"{}\" must be a string", self.name)),
            },
            Constraint::IsoDate => value
                .as_str()
                .and_then(parse_iso_date)
                .map(|date| Value::String(date.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
                .ok_or_else(|| format!("\"{}\" must be in ISO 8601 date format", self.name)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub rules: &'static [FieldRule],
}

impl Schema {
    pub const fn new(name: &'static str, rules: &'static [FieldRule]) -> Self {
        Self { name, rules }
    }

    fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.name == field)
    }

    /// Validates `input` against every rule.
    ///
    /// Returns the normalized field set, or every violation in rule order
    /// followed by unknown keys.
    pub fn validate(&self, input: &Map<String, Value>) -> Result<Map<String, Value>, Vec<String>> {
        let mut normalized = Map::new();
        let mut violations = Vec::new();

        for rule in self.rules {
            match input.get(rule.name) {
                Some(value) => match rule.check(value) {
                    Ok(value) => {
                        normalized.insert(rule.name.to_string(), value);
                    }
                    Err(message) => violations.push(message),
                },
                None if rule.presence == Presence::Required => {
                    violations.push(format!("\"{}\" is required", rule.name));
                }
                None => {}
            }
        }

        for key in input.keys() {
            if self.rule(key).is_none() {
                violations.push(format!("\"{}\" is not allowed", key));
            }
        }

        if violations.is_empty() {
            Ok(normalized)
        } else {
            Err(violations)
        }
    }
}

/// Parses an ISO 8601 date or date-time.
///
/// Inputs without an offset are read as UTC; a bare date means midnight UTC.
pub fn parse_iso_date(input: &str) -> Option<DateTime<Utc>> {
    // Postgres timestamps stop at microseconds.
    parse_utc(input.trim()).map(|date| date.trunc_subsecs(6))
}

fn parse_utc(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
