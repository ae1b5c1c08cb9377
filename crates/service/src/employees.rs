use crate::error::ServiceError;
use crate::validation::{self, validate_employee, validate_search_query};
use core_types::{Employee, EmployeeStats, Field, NewEmployee};
use database::{DbError, EmployeeRepository, PHONE_UNIQUE_CONSTRAINT};
use std::sync::Arc;

/// Gatekeeper in front of an [`EmployeeRepository`].
///
/// Holds no state of its own besides the repository handle, so clones are
/// cheap and every call is independent.
#[derive(Clone)]
pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>) -> Self {
        Self { repo }
    }

    /// Validates and stores a new employee, returning it with its assigned id.
    pub async fn create_employee(&self, employee: NewEmployee) -> Result<Employee, ServiceError> {
        tracing::info!(name = %employee.name, "Creating employee.");

        if let Err(e) = validate_employee(&employee) {
            tracing::warn!(field = %e.field, error = %e, "Employee validation failed.");
            return Err(e.into());
        }

        Ok(self.repo.create(&employee).await?)
    }

    pub async fn get_employee(&self, id: i32) -> Result<Employee, ServiceError> {
        tracing::info!(id, "Fetching employee.");
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn get_all_employees(&self) -> Result<Vec<Employee>, ServiceError> {
        tracing::info!("Fetching all employees.");
        Ok(self.repo.get_all().await?)
    }

    /// Validates and replaces name, phone and city of an existing employee.
    ///
    /// After validation a missing id is reported as not found. The phone is
    /// then checked against every other employee; the store's unique constraint
    /// still backs this up under races.
    pub async fn update_employee(&self, employee: Employee) -> Result<Employee, ServiceError> {
        tracing::info!(id = employee.id, "Updating employee.");

        if let Err(e) = validate_employee(&employee.details()) {
            tracing::warn!(id = employee.id, field = %e.field, error = %e, "Employee validation failed.");
            return Err(e.into());
        }

        self.repo.get_by_id(employee.id).await?;

        if self
            .repo
            .phone_exists(&employee.phone, Some(employee.id))
            .await?
        {
            tracing::warn!(id = employee.id, phone = %employee.phone, "Phone already assigned to another employee.");
            return Err(DbError::ConstraintViolation {
                constraint: PHONE_UNIQUE_CONSTRAINT.to_string(),
                message: format!(
                    "phone {} is already assigned to another employee",
                    employee.phone
                ),
            }
            .into());
        }

        self.repo.update(&employee).await?;
        Ok(employee)
    }

    pub async fn delete_employee(&self, id: i32) -> Result<(), ServiceError> {
        tracing::info!(id, "Deleting employee.");
        Ok(self.repo.delete(id).await?)
    }

    /// Ranked search. Only trimmed queries of 2 to 100 characters reach the repository.
    pub async fn search_employees(&self, query: &str) -> Result<Vec<Employee>, ServiceError> {
        let query = match validate_search_query(query) {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!(search_query = query, error = %e, "Search query rejected.");
                return Err(e.into());
            }
        };

        tracing::info!(search_query = query, "Searching employees.");
        Ok(self.repo.search(query).await?)
    }

    pub async fn employees_by_city(&self, city: &str) -> Result<Vec<Employee>, ServiceError> {
        validation::require(Field::City, city)?;
        tracing::info!(city, "Fetching employees by city.");
        Ok(self.repo.get_by_city(city).await?)
    }

    pub async fn employee_by_phone(&self, phone: &str) -> Result<Employee, ServiceError> {
        validation::require(Field::Phone, phone)?;
        tracing::info!(phone, "Fetching employee by phone.");
        Ok(self.repo.get_by_phone(phone).await?)
    }

    pub async fn employee_stats(&self) -> Result<EmployeeStats, ServiceError> {
        tracing::info!("Computing employee stats.");
        Ok(self.repo.stats().await?)
    }
}
