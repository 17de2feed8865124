// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Declarative modal forms.
//!
//! A [`FormSpec`] lists typed fields; [`FormSpec::parse`] turns the raw
//! strings collected by a renderer into [`FormValues`], parsing each field
//! once according to its [`FieldKind`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::utils::{parse_number, pretty_table};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Single-line text, optionally constrained by a regex.
    Text { pattern: Option<String> },
    Number,
    Date,
    Select { options: Vec<String> },
    Multiline,
}

impl FieldKind {
    pub fn text() -> Self {
        FieldKind::Text { pattern: None }
    }

    pub fn select(options: &[&str]) -> Self {
        FieldKind::Select {
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select { .. } => "select",
            FieldKind::Multiline => "multiline",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub placeholder: Option<String>,
    pub required: bool,
}

impl Field {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            placeholder: None,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, p: &str) -> Self {
        self.placeholder = Some(p.to_string());
        self
    }

    fn parse(&self, raw: &str) -> Result<FieldValue> {
        let raw = raw.trim();
        match &self.kind {
            FieldKind::Text { pattern } => {
                if let Some(p) = pattern {
                    let re = Regex::new(p)?;
                    if !re.is_match(raw) {
                        return Err(Error::invalid_field(
                            &self.name,
                            format!("'{}' does not match {}", raw, p),
                        ));
                    }
                }
                Ok(FieldValue::Text(raw.to_string()))
            }
            FieldKind::Multiline => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Number => parse_number(raw)
                .map(FieldValue::Number)
                .ok_or_else(|| Error::invalid_field(&self.name, format!("'{}' is not a number", raw))),
            FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(FieldValue::Date)
                .map_err(|_| {
                    Error::invalid_field(&self.name, format!("'{}' is not a YYYY-MM-DD date", raw))
                }),
            FieldKind::Select { options } => {
                if options.iter().any(|o| o == raw) {
                    Ok(FieldValue::Choice(raw.to_string()))
                } else {
                    Err(Error::invalid_field(
                        &self.name,
                        format!("'{}' is not one of {}", raw, options.join(", ")),
                    ))
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalMode {
    /// Read-only content with a close action.
    View,
    #[default]
    Form,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormSpec {
    pub title: String,
    pub description: Option<String>,
    pub mode: ModalMode,
    pub action_label: Option<String>,
    pub fields: Vec<Field>,
    pub initial_values: BTreeMap<String, String>,
    /// Prebuilt content for view-mode modals.
    pub content: Option<String>,
}

impl FormSpec {
    pub fn form(title: &str) -> Self {
        Self {
            title: title.to_string(),
            mode: ModalMode::Form,
            ..Default::default()
        }
    }

    pub fn view(title: &str, content: String) -> Self {
        Self {
            title: title.to_string(),
            mode: ModalMode::View,
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn describe(mut self, d: &str) -> Self {
        self.description = Some(d.to_string());
        self
    }

    pub fn action(mut self, label: &str) -> Self {
        self.action_label = Some(label.to_string());
        self
    }

    pub fn field(mut self, f: Field) -> Self {
        self.fields.push(f);
        self
    }

    pub fn initial(mut self, name: &str, value: impl ToString) -> Self {
        self.initial_values.insert(name.to_string(), value.to_string());
        self
    }

    pub fn initial_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.initial(name, v),
            None => self,
        }
    }

    pub fn action_label(&self) -> &str {
        self.action_label.as_deref().unwrap_or("Salvar")
    }

    /// Seeds from the initial values, overlays `raw`, and parses every field.
    /// Keys that are not fields are ignored; blank optional fields are absent.
    pub fn parse(&self, raw: &BTreeMap<String, String>) -> Result<FormValues> {
        let mut values = BTreeMap::new();
        for field in &self.fields {
            let current = raw
                .get(&field.name)
                .or_else(|| self.initial_values.get(&field.name))
                .map(|s| s.trim())
                .filter(|s| !s.is_empty());
            match current {
                Some(s) => {
                    values.insert(field.name.clone(), field.parse(s)?);
                }
                None if field.required => {
                    return Err(Error::invalid_field(&field.name, "is required"));
                }
                None => {}
            }
        }
        Ok(FormValues { values })
    }

    /// Table of fields with their current (initial) values.
    pub fn render(&self) -> String {
        let rows = self
            .fields
            .iter()
            .map(|f| {
                let kind = match &f.kind {
                    FieldKind::Select { options } => format!("select: {}", options.join("|")),
                    other => other.label().to_string(),
                };
                vec![
                    f.name.clone(),
                    if f.required {
                        format!("{} *", f.label)
                    } else {
                        f.label.clone()
                    },
                    kind,
                    self.initial_values
                        .get(&f.name)
                        .cloned()
                        .or_else(|| f.placeholder.clone())
                        .unwrap_or_default(),
                ]
            })
            .collect();
        let mut out = self.title.clone();
        if let Some(d) = &self.description {
            out.push('\n');
            out.push_str(d);
        }
        match self.mode {
            ModalMode::Form => {
                out.push('\n');
                out.push_str(&pretty_table(&["Field", "Label", "Type", "Value"], rows).to_string());
                out.push_str(&format!("\n[{}]", self.action_label()));
            }
            ModalMode::View => {
                if let Some(c) = &self.content {
                    out.push('\n');
                    out.push_str(c);
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Choice(String),
}

/// Parsed submission, keyed by field name.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FormValues {
    values: BTreeMap<String, FieldValue>,
}

impl FormValues {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        match self.values.get(name)? {
            FieldValue::Text(s) | FieldValue::Choice(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Date(d) => Some(d.to_string()),
        }
    }

    pub fn required_text(&self, name: &str) -> Result<String> {
        self.text(name)
            .ok_or_else(|| Error::invalid_field(name, "is required"))
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn required_number(&self, name: &str) -> Result<f64> {
        self.number(name)
            .ok_or_else(|| Error::invalid_field(name, "is required"))
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.values.get(name)? {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Parses `name=value` pairs as collected from the command line.
pub fn raw_values<'a, I>(pairs: I) -> Result<BTreeMap<String, String>>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut out = BTreeMap::new();
    for p in pairs {
        let (k, v) = p
            .split_once('=')
            .ok_or_else(|| Error::invalid_field(p, "expected name=value"))?;
        out.insert(k.trim().to_string(), v.to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> FormSpec {
        FormSpec::form("Nova transacao")
            .field(Field::new("description", "Descricao", FieldKind::text()).required())
            .field(Field::new("amount", "Valor", FieldKind::Number).required())
            .field(Field::new("type", "Tipo", FieldKind::select(&["income", "expense"])).required())
            .field(Field::new("date", "Data", FieldKind::Date))
            .field(Field::new(
                "last_digits",
                "Final",
                FieldKind::Text {
                    pattern: Some(r"^\d{4}$".into()),
                },
            ))
    }

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_each_kind_once() {
        let v = spec()
            .parse(&raw(&[
                ("description", "Mercado"),
                ("amount", "-50,25"),
                ("type", "expense"),
                ("date", "2025-02-03"),
                ("last_digits", "1289"),
            ]))
            .unwrap();
        assert_eq!(v.text("description").as_deref(), Some("Mercado"));
        assert_eq!(v.number("amount"), Some(-50.25));
        assert_eq!(v.date("date"), NaiveDate::from_ymd_opt(2025, 2, 3));
        assert_eq!(v.text("type").as_deref(), Some("expense"));
    }

    #[test]
    fn initial_values_seed_missing_fields() {
        let s = spec()
            .initial("description", "Uber")
            .initial("amount", "-38.9")
            .initial("type", "expense");
        let v = s.parse(&raw(&[("amount", "-40")])).unwrap();
        assert_eq!(v.text("description").as_deref(), Some("Uber"));
        assert_eq!(v.number("amount"), Some(-40.0));
        assert_eq!(v.date("date"), None);
    }

    #[test]
    fn rejects_bad_input_with_field_name() {
        let err = spec()
            .parse(&raw(&[("description", "X"), ("amount", "abc"), ("type", "expense")]))
            .unwrap_err();
        assert!(err.to_string().contains("amount"));

        let err = spec()
            .parse(&raw(&[("description", "X"), ("amount", "1"), ("type", "gift")]))
            .unwrap_err();
        assert!(err.to_string().contains("type"));

        let err = spec()
            .parse(&raw(&[
                ("description", "X"),
                ("amount", "1"),
                ("type", "income"),
                ("last_digits", "12a4"),
            ]))
            .unwrap_err();
        assert!(err.to_string().contains("last_digits"));
    }

    #[test]
    fn missing_required_field() {
        let err = spec().parse(&raw(&[("amount", "1")])).unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "description"));
    }

    #[test]
    fn raw_values_split_on_first_equals() {
        let args = vec!["title=a=b".to_string(), "amount=3".to_string()];
        let m = raw_values(&args).unwrap();
        assert_eq!(m.get("title").map(String::as_str), Some("a=b"));
        assert!(raw_values(&vec!["oops".to_string()]).is_err());
    }
}
