//! Allow-listed partial updates for user profiles.
//!
//! `PATCH /user` accepts an arbitrary JSON object. Only the keys in
//! [`UPDATABLE_FIELDS`] are looked at; each is type-checked and turned into a
//! [`FieldUpdate`]. Column names in the generated SQL come from that static
//! list, and every value is a bound parameter.

use crate::types::{AppError, Result};
use serde_json::{Map, Value};

/// Profile columns a user may change through `PATCH /user`, in SQL order.
pub const UPDATABLE_FIELDS: [&str; 3] = ["name", "age", "email"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub column: &'static str,
    pub value: FieldValue,
}

/// Filters `input` against [`UPDATABLE_FIELDS`] and validates each value.
///
/// Unknown keys are ignored. Fails when nothing updatable is left or when an
/// allowed key carries a value of the wrong type.
pub fn allowed_updates(input: &Map<String, Value>) -> Result<Vec<FieldUpdate>> {
    let mut updates = Vec::new();

    for column in UPDATABLE_FIELDS {
        let Some(raw) = input.get(column) else {
            continue;
        };

        let value = match (column, raw) {
            ("name", Value::String(s)) => FieldValue::Text(s.clone()),
            ("name", Value::Null) => FieldValue::Null,
            ("age", Value::Null) => FieldValue::Null,
            ("age", Value::Number(n)) => match n.as_i64() {
                Some(age) if age >= 0 => FieldValue::Integer(age),
                _ => return Err(invalid_value(column)),
            },
            ("email", Value::String(s)) if is_valid_email(s) => FieldValue::Text(s.clone()),
            _ => return Err(invalid_value(column)),
        };

        updates.push(FieldUpdate { column, value });
    }

    if updates.is_empty() {
        return Err(AppError::InvalidInput(
            "No valid fields to update".to_string(),
        ));
    }

    Ok(updates)
}

fn invalid_value(column: &str) -> AppError {
    AppError::InvalidInput(format!("Invalid value for field '{}'", column))
}

/// Builds the `UPDATE` statement for `updates`.
///
/// Placeholders are numbered: one per update, then `updated_at`, then the
/// subject's uuid last.
pub fn update_statement(updates: &[FieldUpdate]) -> String {
    let mut set_clauses: Vec<String> = updates
        .iter()
        .enumerate()
        .map(|(i, update)| format!("{} = ?{}", update.column, i + 1))
        .collect();

    set_clauses.push(format!("updated_at = ?{}", updates.len() + 1));

    format!(
        "UPDATE users SET {} WHERE uuid = ?{}",
        set_clauses.join(", "),
        updates.len() + 2
    )
}

/// Loose `local@domain.tld` check, enough to reject obvious garbage.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test input is an object")
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let updates = allowed_updates(&object(json!({
            "name": "Ada",
            "password_hash": "x",
            "uuid": "someone-else",
            "id": 1
        })))
        .expect("name is allowed");

        assert_eq!(
            updates,
            vec![FieldUpdate {
                column: "name",
                value: FieldValue::Text("Ada".to_string())
            }]
        );
    }

    #[test]
    fn test_fields_follow_allow_list_order() {
        let updates = allowed_updates(&object(json!({
            "email": "ada@example.com",
            "age": 36,
            "name": null
        })))
        .expect("all allowed");

        let columns: Vec<_> = updates.iter().map(|u| u.column).collect();
        assert_eq!(columns, vec!["name", "age", "email"]);
        assert_eq!(updates[0].value, FieldValue::Null);
        assert_eq!(updates[1].value, FieldValue::Integer(36));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "role": "admin" }))]
    #[case(json!({ "created_at": 0, "updated_at": 0 }))]
    fn test_nothing_to_update(#[case] input: Value) {
        let err = allowed_updates(&object(input)).expect_err("no allowed keys");
        assert!(matches!(err, AppError::InvalidInput(msg) if msg == "No valid fields to update"));
    }

    #[rstest]
    #[case(json!({ "age": "thirty" }), "age")]
    #[case(json!({ "age": -1 }), "age")]
    #[case(json!({ "age": 3.5 }), "age")]
    #[case(json!({ "name": 12 }), "name")]
    #[case(json!({ "email": null }), "email")]
    #[case(json!({ "email": "not-an-email" }), "email")]
    fn test_wrong_types_rejected(#[case] input: Value, #[case] field: &str) {
        let err = allowed_updates(&object(input)).expect_err("bad value");
        let expected = format!("Invalid value for field '{}'", field);
        assert!(matches!(err, AppError::InvalidInput(msg) if msg == expected));
    }

    #[test]
    fn test_update_statement_numbering() {
        let updates = vec![
            FieldUpdate {
                column: "name",
                value: FieldValue::Text("Ada".to_string()),
            },
            FieldUpdate {
                column: "email",
                value: FieldValue::Text("ada@example.com".to_string()),
            },
        ];

        assert_eq!(
            update_statement(&updates),
            "UPDATE users SET name = ?1, email = ?2, updated_at = ?3 WHERE uuid = ?4"
        );
    }

    #[rstest]
    #[case("user@example.com", true)]
    #[case("first.last+tag@sub.example.org", true)]
    #[case("", false)]
    #[case("@example.com", false)]
    #[case("user@", false)]
    #[case("user@localhost", false)]
    #[case("user@@example.com", false)]
    #[case("us er@example.com", false)]
    #[case("user@.example.com", false)]
    fn test_email_shape(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(is_valid_email(email), valid);
    }
}
