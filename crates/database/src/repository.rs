use crate::error::DbError;
use crate::search::{self, SEARCH_RESULT_LIMIT};
use async_trait::async_trait;
use core_types::{Employee, EmployeeStats, NewEmployee};
use sqlx::postgres::PgPool;

/// Name of the unique constraint guarding `employees.phone`.
pub const PHONE_UNIQUE_CONSTRAINT: &str = "employees_phone_key";

/// The abstract interface for employee storage.
///
/// The service layer only ever talks to this trait, so the PostgreSQL-backed
/// [`DbRepository`] can be swapped for an in-memory double in tests.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Inserts a new row and returns it with its store-assigned id.
    async fn create(&self, employee: &NewEmployee) -> Result<Employee, DbError>;

    async fn get_by_id(&self, id: i32) -> Result<Employee, DbError>;

    /// All employees in insertion (id) order.
    async fn get_all(&self) -> Result<Vec<Employee>, DbError>;

    /// Replaces name, phone and city of the row with `employee.id`.
    async fn update(&self, employee: &Employee) -> Result<(), DbError>;

    async fn delete(&self, id: i32) -> Result<(), DbError>;

    /// Exact phone lookup.
    async fn get_by_phone(&self, phone: &str) -> Result<Employee, DbError>;

    /// Whether any employee other than `exclude_id` already uses `phone`.
    async fn phone_exists(&self, phone: &str, exclude_id: Option<i32>) -> Result<bool, DbError>;

    /// Case-insensitive exact city match, ordered by name.
    async fn get_by_city(&self, city: &str) -> Result<Vec<Employee>, DbError>;

    async fn stats(&self) -> Result<EmployeeStats, DbError>;

    /// Ranked free-text search. See [`crate::search`] for the rules.
    async fn search(&self, query: &str) -> Result<Vec<Employee>, DbError>;
}

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EmployeeRepository for DbRepository {
    async fn create(&self, employee: &NewEmployee) -> Result<Employee, DbError> {
        let created = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (name, phone, city)
            VALUES ($1, $2, $3)
            RETURNING id, name, phone, city
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.phone)
        .bind(&employee.city)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)
        .inspect_err(|e| tracing::error!(error = %e, phone = %employee.phone, "Failed to create employee."))?;

        tracing::info!(id = created.id, "Employee created.");
        Ok(created)
    }

    async fn get_by_id(&self, id: i32) -> Result<Employee, DbError> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, name, phone, city FROM employees WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)
        .inspect_err(|e| tracing::error!(error = %e, id, "Failed to fetch employee."))?;

        employee.ok_or_else(|| {
            tracing::warn!(id, "Employee not found.");
            DbError::employee_not_found(id)
        })
    }

    async fn get_all(&self) -> Result<Vec<Employee>, DbError> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT id, name, phone, city FROM employees ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to list employees."))?;

        tracing::info!(count = employees.len(), "Fetched employee list.");
        Ok(employees)
    }

    async fn update(&self, employee: &Employee) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET name = $2, phone = $3, city = $4, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            "#,
        )
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.phone)
        .bind(&employee.city)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)
        .inspect_err(|e| tracing::error!(error = %e, id = employee.id, "Failed to update employee."))?;

        // Zero affected rows is absence, not a query failure.
        if result.rows_affected() == 0 {
            tracing::warn!(id = employee.id, "Employee to update not found.");
            return Err(DbError::employee_not_found(employee.id));
        }

        tracing::info!(id = employee.id, "Employee updated.");
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)
            .inspect_err(|e| tracing::error!(error = %e, id, "Failed to delete employee."))?;

        if result.rows_affected() == 0 {
            tracing::warn!(id, "Employee to delete not found.");
            return Err(DbError::employee_not_found(id));
        }

        tracing::info!(id, "Employee deleted.");
        Ok(())
    }

    async fn get_by_phone(&self, phone: &str) -> Result<Employee, DbError> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, name, phone, city FROM employees WHERE phone = $1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)
        .inspect_err(|e| tracing::error!(error = %e, phone, "Failed to fetch employee by phone."))?;

        employee.ok_or_else(|| {
            tracing::warn!(phone, "Employee not found by phone.");
            DbError::phone_not_found(phone)
        })
    }

    async fn phone_exists(&self, phone: &str, exclude_id: Option<i32>) -> Result<bool, DbError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM employees
                WHERE phone = $1 AND ($2::INTEGER IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(phone)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)
        .inspect_err(|e| tracing::error!(error = %e, phone, "Failed to check phone existence."))?;

        Ok(exists)
    }

    async fn get_by_city(&self, city: &str) -> Result<Vec<Employee>, DbError> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, phone, city
            FROM employees
            WHERE LOWER(city) = LOWER($1)
            ORDER BY name COLLATE "C" ASC, id ASC
            "#,
        )
        .bind(city)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)
        .inspect_err(|e| tracing::error!(error = %e, city, "Failed to fetch employees by city."))?;

        tracing::info!(city, count = employees.len(), "Fetched employees by city.");
        Ok(employees)
    }

    async fn stats(&self) -> Result<EmployeeStats, DbError> {
        // Ties for the most common city go to the alphabetically first one.
        let stats = sqlx::query_as::<_, EmployeeStats>(
            r#"
            SELECT
                COUNT(*) AS total_count,
                COUNT(DISTINCT city) AS cities_count,
                (
                    SELECT city FROM employees
                    GROUP BY city
                    ORDER BY COUNT(*) DESC, city COLLATE "C" ASC
                    LIMIT 1
                ) AS most_common_city
            FROM employees
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to compute employee stats."))?;

        tracing::info!(
            total = stats.total_count,
            cities = stats.cities_count,
            "Computed employee stats."
        );
        Ok(stats)
    }

    async fn search(&self, query: &str) -> Result<Vec<Employee>, DbError> {
        let Some(query) = search::normalize_query(query) else {
            tracing::warn!("Empty search query, skipping the database.");
            return Ok(Vec::new());
        };

        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, phone, city
            FROM employees
            WHERE LOWER(name) LIKE LOWER($1) ESCAPE '\'
               OR LOWER(phone) LIKE LOWER($1) ESCAPE '\'
               OR LOWER(city) LIKE LOWER($1) ESCAPE '\'
            ORDER BY
                CASE
                    WHEN LOWER(name) LIKE LOWER($2) ESCAPE '\' THEN 1
                    WHEN LOWER(phone) LIKE LOWER($2) ESCAPE '\' THEN 2
                    WHEN LOWER(city) LIKE LOWER($2) ESCAPE '\' THEN 3
                    ELSE 4
                END,
                name COLLATE "C" ASC,
                id ASC
            LIMIT $3
            "#,
        )
        .bind(search::contains_pattern(query))
        .bind(search::prefix_pattern(query))
        .bind(SEARCH_RESULT_LIMIT as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)
        .inspect_err(|e| tracing::error!(error = %e, search_query = query, "Employee search failed."))?;

        tracing::info!(
            search_query = query,
            results_count = employees.len(),
            "Employee search completed."
        );
        Ok(employees)
    }
}
