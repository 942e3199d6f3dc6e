//! Schema checks shared by the adapters.

use money_types::{Attributes, ModelSchema, RepoError};

/// Validates a table or column name and returns it double-quoted.
///
/// Names are ASCII letters, digits and underscores, not starting with a digit.
pub(crate) fn quoted(name: &str) -> Result<String, RepoError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(RepoError::InvalidSchema(format!("invalid identifier: {name:?}")));
    }
    Ok(format!("\"{name}\""))
}

/// Checks every name of a schema; `id` is reserved for the primary key.
pub(crate) fn check_schema(schema: &ModelSchema) -> Result<(), RepoError> {
    quoted(schema.table())?;
    for column in schema.columns() {
        quoted(column)?;
        if column.eq_ignore_ascii_case("id") {
            return Err(RepoError::InvalidSchema(format!(
                "column {column} clashes with the primary key"
            )));
        }
    }
    Ok(())
}

/// Rejects attributes naming columns the schema does not have.
pub(crate) fn check_attributes(
    schema: &ModelSchema,
    attributes: &Attributes,
) -> Result<(), RepoError> {
    match attributes.keys().find(|column| !schema.has_column(column)) {
        Some(column) => Err(RepoError::InvalidSchema(format!(
            "{} has no column {column}",
            schema.table()
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use money_types::StoredValue;

    #[test]
    fn test_quoted() {
        assert_eq!(quoted("users").unwrap(), "\"users\"");
        assert_eq!(quoted("_tmp_2").unwrap(), "\"_tmp_2\"");
        for bad in ["", "2fa", "users; DROP TABLE x", "na\"me", "é"] {
            assert!(matches!(quoted(bad), Err(RepoError::InvalidSchema(_))), "{bad}");
        }
    }

    #[test]
    fn test_id_column_reserved() {
        let schema = ModelSchema::new("User", "users").column("ID");
        assert!(matches!(
            check_schema(&schema),
            Err(RepoError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let schema = ModelSchema::new("User", "users").column("name");
        let attributes = Attributes::from([("email".to_string(), StoredValue::Null)]);
        assert!(check_attributes(&schema, &attributes).is_err());
    }
}
