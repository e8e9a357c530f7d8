//! Resource abstraction layer
//!
//! Generic record management for the studio sections. Each section is a
//! typed [`Record`] held by a [`ListManager`], persisted through a
//! [`DataSource`], and presented through the column and field definitions
//! loaded from the embedded JSON registry.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`record`] - The `Record` capability and the six typed records
//! - [`manager`] - Collection, modal and loading state for one resource
//! - [`datasource`] - Remote persistence (REST) for a record type
//! - [`form`] - Field values for the create/edit modal
//! - [`section`] - Binds the pieces together and drives backend calls
//!
//! # Example
//!
//! ```ignore
//! use crate::resource::datasource::RestDataSource;
//! use crate::resource::record::Booking;
//! use crate::resource::section::{Section, SectionView};
//!
//! let source = RestDataSource::<Booking>::new(client, "Booking");
//! let mut bookings = Section::new(source)?;
//! bookings.mount(&mut notifications);
//! ```

pub mod datasource;
pub mod form;
pub mod manager;
pub mod record;
mod registry;
pub mod section;

pub use form::FormState;
pub use manager::Confirmation;
pub use registry::*;
pub use section::SectionView;

use serde_json::Value;

/// Extract a display string from a JSON value using a dot-separated path
pub fn extract_json_value(item: &Value, path: &str) -> String {
    let mut current = item;

    for part in path.split('.') {
        let next = match part.parse::<usize>() {
            Ok(idx) => current.get(idx),
            Err(_) => current.get(part),
        };
        current = match next {
            Some(v) => v,
            None => return "-".to_string(),
        };
    }

    match current {
        Value::String(s) if s.is_empty() => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => "[object]".to_string(),
    }
}

/// Dollar amount with thousands separators, e.g. `$15,200.00`
pub fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{}", sign, grouped, cents)
}

/// Format a raw cell value according to a column format
pub fn format_cell(raw: &str, format: Option<&str>) -> String {
    match format {
        Some("money") => raw
            .parse::<f64>()
            .map(format_money)
            .unwrap_or_else(|_| raw.to_string()),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_json_value_paths() {
        let item = json!({"fullName": "Jane", "tags": ["a", "b"], "meta": {"n": 3}, "note": ""});

        assert_eq!(extract_json_value(&item, "fullName"), "Jane");
        assert_eq!(extract_json_value(&item, "tags.1"), "b");
        assert_eq!(extract_json_value(&item, "meta.n"), "3");
        assert_eq!(extract_json_value(&item, "missing"), "-");
        assert_eq!(extract_json_value(&item, "note"), "-");
        assert_eq!(extract_json_value(&item, "tags"), "[2 items]");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(15200.0), "$15,200.00");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(-45.5), "-$45.50");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell("1500", Some("money")), "$1,500.00");
        assert_eq!(format_cell("-", Some("money")), "-");
        assert_eq!(format_cell("Cash", None), "Cash");
    }
}
