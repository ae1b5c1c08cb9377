use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use core_types::{Employee, EmployeeStats, NewEmployee};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

type IdPath = WithRejection<Path<i32>, AppError>;
type EmployeeBody = WithRejection<Json<NewEmployee>, AppError>;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Missing `q` is treated as an empty query and rejected by validation.
    #[serde(default)]
    pub q: String,
}

/// # GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "service": "Employee Management" }))
}

/// # POST /api/employees
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): EmployeeBody,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let employee = state.employees.create_employee(payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// # GET /api/employees
pub async fn get_all_employees(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let employees = state.employees.get_all_employees().await?;
    Ok(Json(employees))
}

/// # GET /api/employees/:id
pub async fn get_employee(
    WithRejection(Path(id), _): IdPath,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Employee>, AppError> {
    let employee = state.employees.get_employee(id).await?;
    Ok(Json(employee))
}

/// # PUT /api/employees/:id
/// Replaces name, phone and city wholesale.
pub async fn update_employee(
    WithRejection(Path(id), _): IdPath,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): EmployeeBody,
) -> Result<Json<Employee>, AppError> {
    let employee = state.employees.update_employee(payload.with_id(id)).await?;
    Ok(Json(employee))
}

/// # DELETE /api/employees/:id
pub async fn delete_employee(
    WithRejection(Path(id), _): IdPath,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    state.employees.delete_employee(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// # GET /api/employees/search?q=
/// Ranked search over name, phone and city.
pub async fn search_employees(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, AppError>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let employees = state.employees.search_employees(&params.q).await?;
    Ok(Json(employees))
}

/// # GET /api/employees/stats
pub async fn employee_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EmployeeStats>, AppError> {
    let stats = state.employees.employee_stats().await?;
    Ok(Json(stats))
}

/// # GET /api/employees/city/:city
pub async fn employees_by_city(
    WithRejection(Path(city), _): WithRejection<Path<String>, AppError>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let employees = state.employees.employees_by_city(&city).await?;
    Ok(Json(employees))
}

/// # GET /api/employees/phone/:phone
pub async fn employee_by_phone(
    WithRejection(Path(phone), _): WithRejection<Path<String>, AppError>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Employee>, AppError> {
    let employee = state.employees.employee_by_phone(&phone).await?;
    Ok(Json(employee))
}
