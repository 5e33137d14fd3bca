use std::collections::BTreeMap;

use crate::schema::Table;
use crate::value::SqlValue;

/// One row ready for a bulk insert.
///
/// Only columns that carry a value are present. A column missing from the
/// row is written as `DEFAULT`, so the store applies its own default instead
/// of an explicit `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: i64,
    values: BTreeMap<&'static str, SqlValue>,
}

impl Row {
    pub fn new(id: i64) -> Self {
        let mut values = BTreeMap::new();
        values.insert("id", SqlValue::BigInt(id));
        Self { id, values }
    }

    /// Sets `column` when `value` is present, leaves it unset otherwise.
    pub fn with<V: Into<SqlValue>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.values.insert(column, value.into());
        }
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.values.get(column)
    }

    pub fn is_set(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }
}

/// An entity that can be written to one of the destination tables.
pub trait Record {
    const TABLE: Table;

    fn id(&self) -> i64;

    fn to_row(&self) -> Row;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values_leave_column_unset() {
        let row = Row::new(5)
            .with("name", Some("Club A"))
            .with::<String>("alias", None);

        assert_eq!(row.id(), 5);
        assert!(row.is_set("id"));
        assert!(row.is_set("name"));
        assert!(!row.is_set("alias"));
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name"]);
    }
}
