//! Database property values as display strings.

use super::plain_text;
use crate::notion::{Property, PropertyValue};

/// Render a property value; missing and empty values become `""`.
pub fn format_property(property: Option<&Property>) -> String {
    let Some(property) = property else {
        return String::new();
    };

    match &property.value {
        PropertyValue::Title { title } => plain_text(title),
        PropertyValue::RichText { rich_text } => plain_text(rich_text),
        PropertyValue::Number { number } => number.map(|n| n.to_string()).unwrap_or_default(),
        PropertyValue::Select { select } | PropertyValue::Status { status: select } => {
            select.as_ref().map(|option| option.name.clone()).unwrap_or_default()
        }
        PropertyValue::MultiSelect { multi_select } => multi_select
            .iter()
            .map(|option| option.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        PropertyValue::Date { date } => date.as_ref().and_then(|d| d.start.clone()).unwrap_or_default(),
        PropertyValue::Checkbox { checkbox } => if *checkbox { "✓" } else { "✗" }.to_string(),
        PropertyValue::Url { url: value }
        | PropertyValue::Email { email: value }
        | PropertyValue::PhoneNumber { phone_number: value } => value.clone().unwrap_or_default(),
        PropertyValue::Unsupported => format!("[{}]", property.kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_json(json: &str) -> String {
        let property: Property = serde_json::from_str(json).unwrap();
        format_property(Some(&property))
    }

    #[test]
    fn test_text_properties() {
        assert_eq!(format_json(r#"{ "type": "title", "title": [{ "plain_text": "A" }, { "plain_text": "B" }] }"#), "AB");
        assert_eq!(format_json(r#"{ "type": "rich_text", "rich_text": [{ "plain_text": "note" }] }"#), "note");
    }

    #[test]
    fn test_number_property() {
        assert_eq!(format_json(r#"{ "type": "number", "number": 3 }"#), "3");
        assert_eq!(format_json(r#"{ "type": "number", "number": 2.5 }"#), "2.5");
        assert_eq!(format_json(r#"{ "type": "number", "number": null }"#), "");
    }

    #[test]
    fn test_select_like_properties() {
        assert_eq!(format_json(r#"{ "type": "select", "select": { "name": "High" } }"#), "High");
        assert_eq!(format_json(r#"{ "type": "select", "select": null }"#), "");
        assert_eq!(format_json(r#"{ "type": "status", "status": { "name": "Done" } }"#), "Done");
        assert_eq!(
            format_json(r#"{ "type": "multi_select", "multi_select": [{ "name": "a" }, { "name": "b" }] }"#),
            "a, b"
        );
    }

    #[test]
    fn test_scalar_properties() {
        assert_eq!(format_json(r#"{ "type": "date", "date": { "start": "2024-05-01" } }"#), "2024-05-01");
        assert_eq!(format_json(r#"{ "type": "checkbox", "checkbox": true }"#), "✓");
        assert_eq!(format_json(r#"{ "type": "checkbox", "checkbox": false }"#), "✗");
        assert_eq!(format_json(r#"{ "type": "url", "url": "https://x.dev" }"#), "https://x.dev");
        assert_eq!(format_json(r#"{ "type": "email", "email": "a@b.c" }"#), "a@b.c");
        assert_eq!(format_json(r#"{ "type": "phone_number", "phone_number": null }"#), "");
    }

    #[test]
    fn test_unsupported_and_missing() {
        assert_eq!(format_json(r#"{ "type": "people", "people": [] }"#), "[people]");
        assert_eq!(format_property(None), "");
    }
}
