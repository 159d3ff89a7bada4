use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::Json;
use axum::Router;
use dashmap::mapref::entry::Entry;
use serde_json::{json, Value};
use tracing::info;

use crate::models::courier::CourierCredentials;
use crate::models::ids::CourierId;
use crate::stub::error::{parse_id, AppError};
use crate::stub::state::{CourierAccount, StubState};

pub const CREATE_INSUFFICIENT: &str = "Недостаточно данных для создания учетной записи";
pub const LOGIN_TAKEN: &str = "Этот логин уже используется";
pub const LOGIN_INSUFFICIENT: &str = "Недостаточно данных для входа";
pub const ACCOUNT_NOT_FOUND: &str = "Учетная запись не найдена";
pub const DELETE_INSUFFICIENT: &str = "Недостаточно данных для удаления курьера";
pub const DELETE_UNKNOWN: &str = "Курьера с таким id нет";
pub const SEARCH_INSUFFICIENT: &str = "Недостаточно данных для поиска";
pub const COURIER_NOT_FOUND: &str = "Курьер не найден";

pub fn router() -> Router<Arc<StubState>> {
    Router::new()
        .route("/courier", post(create_courier))
        .route("/courier/login", post(login_courier))
        .route("/courier/", delete(delete_without_id))
        .route("/courier/:id", delete(delete_courier))
        .route("/courier/:id/ordersCount", get(orders_count))
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

async fn create_courier(
    State(state): State<Arc<StubState>>,
    Json(payload): Json<CourierCredentials>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let (Some(login), Some(password), Some(first_name)) = (
        required(payload.login),
        required(payload.password),
        required(payload.first_name),
    ) else {
        return Err(AppError::bad_request(CREATE_INSUFFICIENT));
    };

    match state.logins.entry(login.clone()) {
        Entry::Occupied(_) => return Err(AppError::conflict(LOGIN_TAKEN)),
        Entry::Vacant(slot) => {
            let id = state.allocate_courier_id();
            state.couriers.insert(
                id,
                CourierAccount {
                    id,
                    login: login.clone(),
                    password,
                    first_name,
                },
            );
            slot.insert(id);
        }
    }

    state.metrics.couriers_registered.inc();
    info!(login = %login, "courier created");

    Ok((StatusCode::CREATED, Json(json!({ "ok": true }))))
}

async fn login_courier(
    State(state): State<Arc<StubState>>,
    Json(payload): Json<CourierCredentials>,
) -> Result<Json<Value>, AppError> {
    let (Some(login), Some(password)) = (required(payload.login), required(payload.password))
    else {
        return Err(AppError::bad_request(LOGIN_INSUFFICIENT));
    };

    let id = state
        .logins
        .get(&login)
        .map(|entry| *entry.value())
        .ok_or_else(|| AppError::not_found(ACCOUNT_NOT_FOUND))?;

    let account = state
        .couriers
        .get(&id)
        .ok_or_else(|| AppError::not_found(ACCOUNT_NOT_FOUND))?;
    if account.password != password {
        return Err(AppError::not_found(ACCOUNT_NOT_FOUND));
    }

    Ok(Json(json!({ "id": account.id })))
}

async fn delete_without_id() -> AppError {
    AppError::bad_request(DELETE_INSUFFICIENT)
}

async fn delete_courier(
    State(state): State<Arc<StubState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = CourierId(parse_id(Some(&raw_id), DELETE_INSUFFICIENT)?);

    let (_, account) = state
        .couriers
        .remove(&id)
        .ok_or_else(|| AppError::not_found(DELETE_UNKNOWN))?;
    state.logins.remove(&account.login);

    state.metrics.couriers_registered.dec();
    info!(courier_id = %id, "courier deleted");

    Ok(Json(json!({ "ok": true })))
}

async fn orders_count(
    State(state): State<Arc<StubState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = CourierId(parse_id(Some(&raw_id), SEARCH_INSUFFICIENT)?);
    if !state.couriers.contains_key(&id) {
        return Err(AppError::not_found(COURIER_NOT_FOUND));
    }

    let count = state
        .orders
        .iter()
        .filter(|entry| entry.value().courier_id == Some(id))
        .count();

    Ok(Json(json!({ "id": id, "ordersCount": count })))
}
