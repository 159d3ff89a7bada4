use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::models::ids::{CourierId, OrderId, Track};
use crate::models::order::{Order, OrderColor, OrderPage, OrderRecord, OrderStatus, PageInfo};
use crate::stub::error::{parse_id, AppError};
use crate::stub::state::StubState;

pub const ORDER_INSUFFICIENT: &str = "Недостаточно данных для создания заказа";
pub const INVALID_COLOR: &str = "Некорректный цвет самоката";
pub const SEARCH_INSUFFICIENT: &str = "Недостаточно данных для поиска";
pub const TRACK_NOT_FOUND: &str = "Заказ не найден";
pub const ORDER_ID_NOT_FOUND: &str = "Заказа с таким id не существует";
pub const COURIER_ID_NOT_FOUND: &str = "Курьера с таким id не существует";
pub const ALREADY_IN_DELIVERY: &str = "Этот заказ уже в работе";
pub const CANNOT_FINISH: &str = "Этот заказ нельзя завершить";

const MAX_COLORS: usize = 2;
const DEFAULT_LIMIT: u32 = 30;

pub fn router() -> Router<Arc<StubState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/track", get(get_by_track))
        .route("/orders/accept/", put(missing_order_id))
        .route("/orders/accept/:id", put(accept_order))
        .route("/orders/finish/", put(missing_order_id))
        .route("/orders/finish/:id", put(finish_order))
        .route("/orders/cancel", put(cancel_order))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    address: Option<String>,
    metro_station: Option<String>,
    phone: Option<String>,
    rent_time: Option<i64>,
    delivery_date: Option<String>,
    comment: Option<String>,
    #[serde(default)]
    color: Vec<OrderColor>,
}

impl CreateOrderRequest {
    fn into_order(self) -> Result<Order, AppError> {
        if self.color.len() > MAX_COLORS || self.color.iter().any(|color| !color.is_documented()) {
            return Err(AppError::bad_request(INVALID_COLOR));
        }

        let filled = |value: Option<String>| value.filter(|value| !value.trim().is_empty());
        let (
            Some(first_name),
            Some(last_name),
            Some(address),
            Some(metro_station),
            Some(phone),
            Some(rent_time_days),
            Some(delivery_date),
        ) = (
            filled(self.first_name),
            filled(self.last_name),
            filled(self.address),
            filled(self.metro_station),
            filled(self.phone),
            self.rent_time.filter(|days| *days > 0),
            filled(self.delivery_date),
        )
        else {
            return Err(AppError::bad_request(ORDER_INSUFFICIENT));
        };

        Ok(Order {
            first_name,
            last_name,
            address,
            metro_station,
            phone,
            rent_time_days,
            delivery_date,
            comment: self.comment,
            colors: self.color,
        })
    }
}

#[derive(Deserialize)]
pub struct TrackQuery {
    t: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelQuery {
    track: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourierQuery {
    courier_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    courier_id: Option<String>,
    limit: Option<u32>,
    page: Option<u32>,
}

async fn create_order(
    State(state): State<Arc<StubState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let details = payload.into_order()?;
    let (id, track) = state.allocate_order_handles();

    let record = OrderRecord {
        id,
        track,
        status: OrderStatus::Created,
        courier_id: None,
        courier_first_name: None,
        in_delivery: false,
        finished: false,
        cancelled: false,
        created_at: Some(Utc::now().to_rfc3339()),
        details,
    };

    state.orders.insert(id, record);
    state.tracks.insert(track, id);
    state
        .metrics
        .order_transitions_total
        .with_label_values(&["created"])
        .inc();
    info!(order_id = %id, track = %track, "order created");

    Ok((StatusCode::CREATED, Json(json!({ "track": track }))))
}

async fn get_by_track(
    State(state): State<Arc<StubState>>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<Value>, AppError> {
    let track = Track(parse_id(query.t.as_deref(), SEARCH_INSUFFICIENT)?);

    let id = state
        .tracks
        .get(&track)
        .map(|entry| *entry.value())
        .ok_or_else(|| AppError::not_found(TRACK_NOT_FOUND))?;
    let order = state
        .orders
        .get(&id)
        .ok_or_else(|| AppError::not_found(TRACK_NOT_FOUND))?;

    Ok(Json(json!({ "order": order.value() })))
}

async fn list_orders(
    State(state): State<Arc<StubState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<OrderPage>, AppError> {
    let courier_filter = match query.courier_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let id = raw
                .parse::<i64>()
                .map(CourierId)
                .map_err(|_| AppError::bad_request(SEARCH_INSUFFICIENT))?;
            if !state.couriers.contains_key(&id) {
                return Err(AppError::NotFound(format!(
                    "Курьер с идентификатором {id} не найден"
                )));
            }
            Some(id)
        }
    };

    let mut orders: Vec<OrderRecord> = state
        .orders
        .iter()
        .filter(|entry| courier_filter.is_none() || entry.value().courier_id == courier_filter)
        .map(|entry| entry.value().clone())
        .collect();
    orders.sort_by_key(|order| order.id);

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let page = query.page.unwrap_or(0);
    let total = orders.len();
    let orders = orders
        .into_iter()
        .skip(page as usize * limit as usize)
        .take(limit as usize)
        .collect();

    Ok(Json(OrderPage {
        orders,
        page_info: PageInfo {
            page: i64::from(page),
            total: total as i64,
            limit: i64::from(limit),
        },
    }))
}

async fn missing_order_id() -> AppError {
    AppError::bad_request(SEARCH_INSUFFICIENT)
}

async fn accept_order(
    State(state): State<Arc<StubState>>,
    Path(raw_id): Path<String>,
    Query(query): Query<CourierQuery>,
) -> Result<Json<Value>, AppError> {
    let id = OrderId(parse_id(Some(&raw_id), SEARCH_INSUFFICIENT)?);
    let courier_id = CourierId(parse_id(query.courier_id.as_deref(), SEARCH_INSUFFICIENT)?);

    let mut order = state
        .orders
        .get_mut(&id)
        .ok_or_else(|| AppError::not_found(ORDER_ID_NOT_FOUND))?;
    let courier_first_name = state
        .couriers
        .get(&courier_id)
        .map(|courier| courier.first_name.clone())
        .ok_or_else(|| AppError::not_found(COURIER_ID_NOT_FOUND))?;

    if order.courier_id.is_some() {
        return Err(AppError::conflict(ALREADY_IN_DELIVERY));
    }

    order.courier_id = Some(courier_id);
    order.courier_first_name = Some(courier_first_name);
    order.status = OrderStatus::InDelivery;
    order.in_delivery = true;
    drop(order);

    state
        .metrics
        .order_transitions_total
        .with_label_values(&["accepted"])
        .inc();
    info!(order_id = %id, courier_id = %courier_id, "order accepted");

    Ok(Json(json!({ "ok": true })))
}

async fn finish_order(
    State(state): State<Arc<StubState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = OrderId(parse_id(Some(&raw_id), SEARCH_INSUFFICIENT)?);

    let mut order = state
        .orders
        .get_mut(&id)
        .ok_or_else(|| AppError::not_found(ORDER_ID_NOT_FOUND))?;
    if order.status != OrderStatus::InDelivery {
        return Err(AppError::conflict(CANNOT_FINISH));
    }

    order.status = OrderStatus::Finished;
    order.in_delivery = false;
    order.finished = true;
    drop(order);

    state
        .metrics
        .order_transitions_total
        .with_label_values(&["finished"])
        .inc();
    info!(order_id = %id, "order finished");

    Ok(Json(json!({ "ok": true })))
}

/// Cancelled orders leave the store entirely, so neither the track nor the
/// id resolves afterwards.
async fn cancel_order(
    State(state): State<Arc<StubState>>,
    Query(query): Query<CancelQuery>,
) -> Result<Json<Value>, AppError> {
    let track = Track(parse_id(query.track.as_deref(), SEARCH_INSUFFICIENT)?);

    let id = state
        .tracks
        .get(&track)
        .map(|entry| *entry.value())
        .ok_or_else(|| AppError::not_found(TRACK_NOT_FOUND))?;

    let removed = state
        .orders
        .remove_if(&id, |_, order| order.status == OrderStatus::Created);
    if removed.is_none() {
        return Err(if state.orders.contains_key(&id) {
            AppError::conflict(ALREADY_IN_DELIVERY)
        } else {
            AppError::not_found(TRACK_NOT_FOUND)
        });
    }
    state.tracks.remove(&track);

    state
        .metrics
        .order_transitions_total
        .with_label_values(&["cancelled"])
        .inc();
    info!(order_id = %id, track = %track, "order cancelled");

    Ok(Json(json!({ "ok": true })))
}
