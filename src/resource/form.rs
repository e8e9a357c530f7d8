//! Form State
//!
//! Editable field values for the create/edit modal, built from a
//! resource's field definitions. Produces the [`FormData`] the list
//! manager submits; never includes `id` or `createdAt`.

use super::record::{to_json, FormData, Record};
use super::registry::{FieldDef, FieldKind};
use anyhow::Result;
use chrono::NaiveDate;
use serde_json::{Number, Value};

#[derive(Debug, Clone)]
pub struct FormState {
    pub fields: &'static [FieldDef],
    pub values: Vec<String>,
    pub focus: usize,
    /// Validation message shown under the form
    pub error: Option<String>,
    pub editing: bool,
    /// Creation timestamp of the record being edited, shown read-only
    pub created_at: Option<String>,
}

impl FormState {
    /// Empty form seeded with field defaults
    pub fn for_create(fields: &'static [FieldDef]) -> Self {
        let values = fields
            .iter()
            .map(|f| match (&f.default, f.kind) {
                (Some(default), _) => default.clone(),
                (None, FieldKind::Select) => f.options.first().cloned().unwrap_or_default(),
                (None, _) => String::new(),
            })
            .collect();

        Self {
            fields,
            values,
            focus: 0,
            error: None,
            editing: false,
            created_at: None,
        }
    }

    /// Form pre-filled from an existing record
    pub fn for_edit<R: Record>(fields: &'static [FieldDef], record: &R) -> Self {
        let json = to_json(record);
        let values = fields
            .iter()
            .map(|f| match json.get(&f.key) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                    _ => n.to_string(),
                },
                Some(Value::Bool(b)) => b.to_string(),
                _ => String::new(),
            })
            .collect();

        Self {
            fields,
            values,
            focus: 0,
            error: None,
            editing: true,
            created_at: Some(record.created_at().to_string()).filter(|t| !t.is_empty()),
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Type into the focused field. Select fields ignore typing.
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.fields.get(self.focus) else {
            return;
        };
        if field.kind == FieldKind::Select {
            return;
        }
        if field.kind == FieldKind::Number && !(c.is_ascii_digit() || c == '.' || c == '-') {
            return;
        }
        self.values[self.focus].push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get(self.focus) {
            if field.kind != FieldKind::Select {
                self.values[self.focus].pop();
            }
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(field) = self.fields.get(self.focus) {
            if field.kind != FieldKind::Select {
                self.values[self.focus].clear();
            }
        }
    }

    /// Step a select field through its options
    pub fn cycle_option(&mut self, forward: bool) {
        let Some(field) = self.fields.get(self.focus) else {
            return;
        };
        if field.kind != FieldKind::Select || field.options.is_empty() {
            return;
        }

        let len = field.options.len();
        let current = field
            .options
            .iter()
            .position(|o| *o == self.values[self.focus]);
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        self.values[self.focus] = field.options[next].clone();
    }

    /// Validate and collect the field set
    pub fn to_form_data(&self) -> Result<FormData> {
        let mut data = FormData::new();

        for (field, raw) in self.fields.iter().zip(&self.values) {
            let value = raw.trim();
            if value.is_empty() {
                if field.required {
                    anyhow::bail!("{} is required", field.label);
                }
                data.insert(field.key.clone(), Value::String(String::new()));
                continue;
            }

            let json = match field.kind {
                FieldKind::Number => parse_number(value)
                    .ok_or_else(|| anyhow::anyhow!("{} must be a number", field.label))?,
                FieldKind::Email if !value.contains('@') => {
                    anyhow::bail!("{} must be an email address", field.label)
                },
                FieldKind::Date if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() => {
                    anyhow::bail!("{} must be a date (YYYY-MM-DD)", field.label)
                },
                FieldKind::Url if url::Url::parse(value).is_err() => {
                    anyhow::bail!("{} must be a URL", field.label)
                },
                _ => Value::String(value.to_string()),
            };
            data.insert(field.key.clone(), json);
        }

        Ok(data)
    }
}

/// Whole numbers stay integers on the wire
fn parse_number(value: &str) -> Option<Value> {
    if let Ok(i) = value.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    let f = value.parse::<f64>().ok()?;
    Number::from_f64(f).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::record::Collection;
    use crate::resource::registry::get_resource;
    use serde_json::json;

    fn collection_form() -> FormState {
        FormState::for_create(&get_resource("collections").unwrap().fields)
    }

    fn focus_key(form: &mut FormState, key: &str) {
        form.focus = form.fields.iter().position(|f| f.key == key).unwrap();
    }

    #[test]
    fn test_create_form_uses_defaults() {
        let form = FormState::for_create(&get_resource("photos").unwrap().fields);
        let idx = form.fields.iter().position(|f| f.key == "imageUrl").unwrap();
        assert_eq!(form.values[idx], "https://picsum.photos/400/300");
        assert!(!form.editing);
    }

    #[test]
    fn test_select_defaults_to_first_option() {
        let form = collection_form();
        let idx = form
            .fields
            .iter()
            .position(|f| f.key == "paymentMethod")
            .unwrap();
        assert_eq!(form.values[idx], form.fields[idx].options[0]);
    }

    #[test]
    fn test_edit_form_prefills_from_record() {
        let record: Collection = serde_json::from_value(json!({
            "id": "1",
            "createdAt": "2024-06-01T08:00:00.000Z",
            "name": "Deposit",
            "amount": 500,
            "paymentMethod": "Card"
        }))
        .unwrap();
        let form = FormState::for_edit(&get_resource("collections").unwrap().fields, &record);

        assert!(form.editing);
        assert!(form.values.contains(&"Deposit".to_string()));
        assert!(form.values.contains(&"500".to_string()));
        assert_eq!(form.created_at.as_deref(), Some("2024-06-01T08:00:00.000Z"));
    }

    #[test]
    fn test_edit_form_without_timestamp_shows_none() {
        let record: Collection =
            serde_json::from_value(json!({"id": 3, "name": "Deposit"})).unwrap();
        let form = FormState::for_edit(&get_resource("collections").unwrap().fields, &record);

        assert!(form.created_at.is_none());
        assert!(collection_form().created_at.is_none());
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut form = collection_form();
        let len = form.fields.len();
        form.previous_field();
        assert_eq!(form.focus, len - 1);
        form.next_field();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_number_field_rejects_letters() {
        let mut form = collection_form();
        focus_key(&mut form, "amount");
        for c in "12a.5".chars() {
            form.input_char(c);
        }
        assert_eq!(form.values[form.focus], "12.5");
    }

    #[test]
    fn test_select_cycles_and_ignores_typing() {
        let mut form = collection_form();
        focus_key(&mut form, "paymentMethod");
        let options = form.fields[form.focus].options.clone();

        form.input_char('x');
        assert_eq!(form.values[form.focus], options[0]);

        form.cycle_option(true);
        assert_eq!(form.values[form.focus], options[1]);
        form.cycle_option(false);
        form.cycle_option(false);
        assert_eq!(form.values[form.focus], options[options.len() - 1]);
    }

    #[test]
    fn test_form_data_excludes_identity_and_types_numbers() {
        let mut form = collection_form();
        focus_key(&mut form, "name");
        "Wedding deposit".chars().for_each(|c| form.input_char(c));
        focus_key(&mut form, "amount");
        "1500".chars().for_each(|c| form.input_char(c));

        let data = form.to_form_data().unwrap();

        assert_eq!(data.get("name"), Some(&json!("Wedding deposit")));
        assert_eq!(data.get("amount"), Some(&json!(1500)));
        assert!(!data.contains_key("id"));
        assert!(!data.contains_key("createdAt"));
    }

    #[test]
    fn test_required_field_blocks_submit() {
        let form = collection_form();
        let err = form.to_form_data().unwrap_err();
        assert!(err.to_string().contains("is required"));
    }

    #[test]
    fn test_date_field_is_validated() {
        let mut form = FormState::for_create(&get_resource("bookings").unwrap().fields);
        for (i, field) in form.fields.iter().enumerate() {
            if field.required {
                form.values[i] = match field.kind {
                    FieldKind::Email => "a@b.c".to_string(),
                    FieldKind::Date => "2024-05-01".to_string(),
                    FieldKind::Number => "1".to_string(),
                    _ => "x".to_string(),
                };
            }
        }
        assert!(form.to_form_data().is_ok());

        let idx = form.fields.iter().position(|f| f.key == "startDate").unwrap();
        form.values[idx] = "01/05/2024".to_string();
        assert!(form.to_form_data().is_err());
    }
}
