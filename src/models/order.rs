use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::ids::{CourierId, OrderId, Track};

/// Scooter color tag. `Other` carries tags outside the documented
/// enumeration so scenarios can send them on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderColor {
    Black,
    Gray,
    Other(String),
}

impl OrderColor {
    pub fn as_str(&self) -> &str {
        match self {
            OrderColor::Black => "BLACK",
            OrderColor::Gray => "GRAY",
            OrderColor::Other(tag) => tag,
        }
    }

    pub fn is_documented(&self) -> bool {
        !matches!(self, OrderColor::Other(_))
    }
}

impl From<String> for OrderColor {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "BLACK" => OrderColor::Black,
            "GRAY" => OrderColor::Gray,
            _ => OrderColor::Other(tag),
        }
    }
}

impl From<&str> for OrderColor {
    fn from(tag: &str) -> Self {
        OrderColor::from(tag.to_string())
    }
}

impl From<OrderColor> for String {
    fn from(color: OrderColor) -> Self {
        color.as_str().to_string()
    }
}

impl fmt::Display for OrderColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery progression. Cancellation is a separate flag, not a status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum OrderStatus {
    #[default]
    Created,
    InDelivery,
    Finished,
}

impl OrderStatus {
    pub fn code(self) -> i64 {
        match self {
            OrderStatus::Created => 0,
            OrderStatus::InDelivery => 1,
            OrderStatus::Finished => 2,
        }
    }
}

impl TryFrom<i64> for OrderStatus {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(OrderStatus::Created),
            1 => Ok(OrderStatus::InDelivery),
            2 => Ok(OrderStatus::Finished),
            other => Err(format!("unknown order status {other}")),
        }
    }
}

impl From<OrderStatus> for i64 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

/// Order creation body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    /// Metro station code.
    pub metro_station: String,
    pub phone: String,
    #[serde(rename = "rentTime")]
    pub rent_time_days: i64,
    pub delivery_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "color", default)]
    pub colors: Vec<OrderColor>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        metro_station: impl Into<String>,
        phone: impl Into<String>,
        rent_time_days: i64,
        delivery_date: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            metro_station: metro_station.into(),
            phone: phone.into(),
            rent_time_days,
            delivery_date: delivery_date.into(),
            comment: Some(comment.into()),
            colors: Vec::new(),
        }
    }

    pub fn with_colors<I, C>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<OrderColor>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }
}

/// An order as the service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: OrderId,
    pub track: Track,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub courier_id: Option<CourierId>,
    #[serde(default)]
    pub courier_first_name: Option<String>,
    #[serde(default)]
    pub in_delivery: bool,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub details: Order,
}

/// The two handles of an order, read from any order representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHandle {
    pub id: OrderId,
    pub track: Track,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: i64,
    pub total: i64,
    pub limit: i64,
}

/// Body of `GET /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub orders: Vec<OrderRecord>,
    pub page_info: PageInfo,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Order, OrderColor, OrderRecord, OrderStatus};
    use crate::models::ids::{OrderId, Track};

    fn order() -> Order {
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

    #[test]
    fn undocumented_colors_survive_serialization() {
        let body = serde_json::to_value(order().with_colors(["BLACK", "GRAY", "PURPLE"])).unwrap();
        assert_eq!(body["color"], json!(["BLACK", "GRAY", "PURPLE"]));
        assert_eq!(body["rentTime"], 2);
        assert_eq!(body["metroStation"], "5");
    }

    #[test]
    fn color_tags_parse_into_the_enumeration() {
        assert_eq!(OrderColor::from("BLACK"), OrderColor::Black);
        assert_eq!(OrderColor::from("BLA"), OrderColor::Other("BLA".to_string()));
        assert!(!OrderColor::from("PURPLE").is_documented());
    }

    #[test]
    fn record_without_status_or_courier_is_unassigned() {
        let record: OrderRecord = serde_json::from_value(json!({
            "id": 7,
            "track": 100007,
            "courierId": null,
            "firstName": "Имя",
            "lastName": "Фамилия",
            "address": "Адрес",
            "metroStation": "4",
            "phone": "+7",
            "rentTime": 5,
            "deliveryDate": "2023-06-06",
            "color": []
        }))
        .unwrap();

        assert_eq!(record.id, OrderId(7));
        assert_eq!(record.track, Track(100007));
        assert_eq!(record.status, OrderStatus::Created);
        assert!(record.courier_id.is_none());
        assert_eq!(record.details.rent_time_days, 5);
    }

    #[test]
    fn unknown_status_codes_are_rejected() {
        assert!(serde_json::from_value::<OrderStatus>(json!(9)).is_err());
        assert_eq!(serde_json::to_value(OrderStatus::Finished).unwrap(), json!(2));
    }
}
