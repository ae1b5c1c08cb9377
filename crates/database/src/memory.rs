//! An in-process [`EmployeeRepository`] for tests.
//!
//! It mirrors the PostgreSQL behaviour that callers depend on: sequential ids,
//! the phone uniqueness constraint, affected-row not-found detection, the
//! city and stats queries, and the ranked search.

use crate::error::DbError;
use crate::repository::{EmployeeRepository, PHONE_UNIQUE_CONSTRAINT};
use crate::search;
use async_trait::async_trait;
use core_types::{Employee, EmployeeStats, NewEmployee};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Employee>,
}

impl Table {
    fn phone_taken(&self, phone: &str, exclude_id: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|row| row.phone == phone && Some(row.id) != exclude_id)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    table: Mutex<Table>,
}

fn duplicate_phone(phone: &str) -> DbError {
    DbError::ConstraintViolation {
        constraint: PHONE_UNIQUE_CONSTRAINT.to_string(),
        message: format!("duplicate key value violates unique constraint (phone)=({phone})"),
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository pre-populated through [`EmployeeRepository::create`].
    pub async fn seeded<I>(employees: I) -> Result<Self, DbError>
    where
        I: IntoIterator<Item = NewEmployee>,
    {
        let repo = Self::new();
        for employee in employees {
            repo.create(&employee).await?;
        }
        Ok(repo)
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryRepository {
    async fn create(&self, employee: &NewEmployee) -> Result<Employee, DbError> {
        let mut table = self.table.lock().await;
        if table.phone_taken(&employee.phone, None) {
            return Err(duplicate_phone(&employee.phone));
        }
        table.last_id += 1;
        let created = employee.clone().with_id(table.last_id);
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i32) -> Result<Employee, DbError> {
        let table = self.table.lock().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::employee_not_found(id))
    }

    async fn get_all(&self) -> Result<Vec<Employee>, DbError> {
        let table = self.table.lock().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn update(&self, employee: &Employee) -> Result<(), DbError> {
        let mut table = self.table.lock().await;
        if !table.rows.contains_key(&employee.id) {
            return Err(DbError::employee_not_found(employee.id));
        }
        if table.phone_taken(&employee.phone, Some(employee.id)) {
            return Err(duplicate_phone(&employee.phone));
        }
        table.rows.insert(employee.id, employee.clone());
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        let mut table = self.table.lock().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::employee_not_found(id))
    }

    async fn get_by_phone(&self, phone: &str) -> Result<Employee, DbError> {
        let table = self.table.lock().await;
        table
            .rows
            .values()
            .find(|row| row.phone == phone)
            .cloned()
            .ok_or_else(|| DbError::phone_not_found(phone))
    }

    async fn phone_exists(&self, phone: &str, exclude_id: Option<i32>) -> Result<bool, DbError> {
        Ok(self.table.lock().await.phone_taken(phone, exclude_id))
    }

    async fn get_by_city(&self, city: &str) -> Result<Vec<Employee>, DbError> {
        let wanted = city.to_lowercase();
        let table = self.table.lock().await;
        let mut employees: Vec<Employee> = table
            .rows
            .values()
            .filter(|row| row.city.to_lowercase() == wanted)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(employees)
    }

    async fn stats(&self) -> Result<EmployeeStats, DbError> {
        let table = self.table.lock().await;
        let mut per_city: HashMap<&str, i64> = HashMap::new();
        for row in table.rows.values() {
            *per_city.entry(row.city.as_str()).or_default() += 1;
        }

        // Highest count wins; ties go to the alphabetically first city.
        let most_common_city = per_city
            .iter()
            .max_by(|(city_a, count_a), (city_b, count_b)| {
                count_a.cmp(count_b).then_with(|| city_b.cmp(city_a))
            })
            .map(|(city, _)| city.to_string());

        Ok(EmployeeStats {
            total_count: table.rows.len() as i64,
            cities_count: per_city.len() as i64,
            most_common_city,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<Employee>, DbError> {
        let Some(query) = search::normalize_query(query) else {
            return Ok(Vec::new());
        };
        let table = self.table.lock().await;
        Ok(search::rank(table.rows.values().cloned(), query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> NewEmployee {
        NewEmployee::new("Alice", "+7701", "Almaty")
    }

    #[tokio::test]
    async fn ids_are_positive_and_sequential() {
        let repo = InMemoryRepository::new();
        let first = repo.create(&alice()).await.unwrap();
        let second = repo
            .create(&NewEmployee::new("Bob", "+7702", "Astana"))
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn duplicate_phone_is_a_constraint_violation() {
        let repo = InMemoryRepository::new();
        repo.create(&alice()).await.unwrap();
        let err = repo
            .create(&NewEmployee::new("Alicia", "+7701", "Astana"))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "got {err:?}");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let repo = InMemoryRepository::new();
        let missing = NewEmployee::new("Ghost", "0", "Nowhere").with_id(42);
        assert!(repo.update(&missing).await.unwrap_err().is_not_found());
        assert!(repo.delete(42).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn update_may_keep_its_own_phone() {
        let repo = InMemoryRepository::new();
        let mut employee = repo.create(&alice()).await.unwrap();
        employee.city = "Astana".to_string();
        repo.update(&employee).await.unwrap();
        assert_eq!(repo.get_by_id(employee.id).await.unwrap().city, "Astana");
    }

    #[tokio::test]
    async fn phone_exists_honours_exclusion() {
        let repo = InMemoryRepository::new();
        let employee = repo.create(&alice()).await.unwrap();
        assert!(repo.phone_exists("+7701", None).await.unwrap());
        assert!(!repo.phone_exists("+7701", Some(employee.id)).await.unwrap());
        assert!(!repo.phone_exists("+7799", None).await.unwrap());
    }

    #[tokio::test]
    async fn get_by_phone_reports_the_phone_when_missing() {
        let repo = InMemoryRepository::new();
        let err = repo.get_by_phone("+7799").await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound { entity: "employee by phone", .. }
        ));
    }

    #[tokio::test]
    async fn stats_break_city_ties_alphabetically() {
        let repo = InMemoryRepository::seeded([
            NewEmployee::new("A", "1", "Taraz"),
            NewEmployee::new("B", "2", "Astana"),
            NewEmployee::new("C", "3", "Taraz"),
            NewEmployee::new("D", "4", "Astana"),
            NewEmployee::new("E", "5", "Oral"),
        ])
        .await
        .unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_count, 5);
        assert_eq!(stats.cities_count, 3);
        assert_eq!(stats.most_common_city.as_deref(), Some("Astana"));
    }

    #[tokio::test]
    async fn stats_of_empty_store() {
        let stats = InMemoryRepository::new().stats().await.unwrap();
        assert_eq!(stats, EmployeeStats::default());
    }
}
