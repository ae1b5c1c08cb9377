use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single row of the `employees` table.
///
/// The `id` is assigned by the store on creation and never changes afterwards.
/// `phone` is unique across the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub city: String,
}

/// The id-less payload used to create an employee or replace one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
}

impl NewEmployee {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            city: city.into(),
        }
    }

    /// Attaches a store-assigned identifier.
    pub fn with_id(self, id: i32) -> Employee {
        Employee {
            id,
            name: self.name,
            phone: self.phone,
            city: self.city,
        }
    }
}

impl Employee {
    /// Strips the identifier, leaving the replaceable attributes.
    pub fn details(&self) -> NewEmployee {
        NewEmployee {
            name: self.name.clone(),
            phone: self.phone.clone(),
            city: self.city.clone(),
        }
    }
}

/// Aggregate figures computed on demand from the current contents of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct EmployeeStats {
    pub total_count: i64,
    pub cities_count: i64,
    /// `None` only when the store is empty.
    pub most_common_city: Option<String>,
}
