use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::clients::{ListOrders, OrderClient};
use crate::error::HarnessError;
use crate::fixture::FixtureTracker;
use crate::models::courier::CourierCredentials;
use crate::models::ids::{CourierId, OrderId, Track};
use crate::models::order::{Order, OrderHandle};
use crate::rest::ResponseSpec;

/// A login no earlier run can have taken.
pub fn unique_login(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &suffix[..10])
}

pub fn sample_order() -> Order {
    Order::new(
        "Имя",
        "Фамилия",
        "Адрес такой-то",
        "5",
        "+79099099999",
        2,
        "2023-06-06",
        "Тестируем",
    )
}

pub fn order_id_by_track(orders: &OrderClient, track: Track) -> Result<OrderId, HarnessError> {
    orders
        .get_by_track(Some(track))?
        .expect(ResponseSpec::OK)?
        .extract_as("order.id")
}

/// Creates an order owned by `tracker` and resolves its internal id.
pub fn create_tracked_order(
    tracker: &mut FixtureTracker,
    order: &Order,
) -> Result<OrderHandle, HarnessError> {
    let created = tracker.create_order(order)?;
    let track: Track = created.expect(ResponseSpec::CREATED)?.extract_as("track")?;
    let id = order_id_by_track(tracker.orders(), track)?;
    Ok(OrderHandle { id, track })
}

/// Creates a courier owned by `tracker` and logs in for its id.
pub fn register_courier(
    tracker: &mut FixtureTracker,
    courier: &CourierCredentials,
) -> Result<CourierId, HarnessError> {
    tracker
        .create_courier(courier)?
        .expect(ResponseSpec::CREATED)?;
    tracker
        .couriers()
        .login(courier)?
        .expect(ResponseSpec::OK)?
        .extract_as("id")
}

/// Any order with no courier assigned, or a fresh one owned by `tracker`
/// when the shared order space has none.
///
/// Other runs share the order space, so the returned order can be claimed
/// before the caller uses it.
pub fn find_or_create_unassigned_order(
    tracker: &mut FixtureTracker,
) -> Result<OrderHandle, HarnessError> {
    let listed = tracker.orders().list(ListOrders::all())?;
    let unassigned = listed
        .expect(ResponseSpec::OK)?
        .find_first("orders", |order| {
            order.get("courierId").is_none_or(Value::is_null)
        })?;

    match unassigned {
        Some(order) => Ok(serde_json::from_value(order)?),
        None => {
            info!("no unassigned order available; creating one");
            create_tracked_order(tracker, &sample_order())
        }
    }
}
