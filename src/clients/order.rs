use crate::error::HarnessError;
use crate::models::ids::{CourierId, OrderId, Track};
use crate::models::order::Order;
use crate::rest::{ApiResponse, RequestBuilder, Transport};

const ORDERS_PATH: &str = "/orders";
const ORDER_BY_TRACK_PATH: &str = "/orders/track";
const ORDER_ACCEPT_PATH: &str = "/orders/accept/{id}";
const ORDER_FINISH_PATH: &str = "/orders/finish/{id}";
const ORDER_CANCEL_PATH: &str = "/orders/cancel";

/// Filter and pagination for `GET /orders`. Unset fields are not sent.
/// Pagination values are counts, so `0` is sent as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOrders {
    pub courier_id: Option<CourierId>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ListOrders {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_courier(courier_id: CourierId) -> Self {
        Self {
            courier_id: Some(courier_id),
            ..Self::default()
        }
    }

    pub fn paged(mut self, limit: u32, page: u32) -> Self {
        self.limit = Some(limit);
        self.page = Some(page);
        self
    }
}

/// Identifiers are `Option`s: `None` sends the parameter empty, which is how
/// the "missing id" failure paths are exercised.
#[derive(Debug, Clone)]
pub struct OrderClient {
    transport: Transport,
}

impl OrderClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn create(&self, order: &Order) -> Result<ApiResponse, HarnessError> {
        self.transport
            .send(RequestBuilder::post(ORDERS_PATH).json(order)?)
    }

    pub fn get_by_track(&self, track: Option<Track>) -> Result<ApiResponse, HarnessError> {
        self.transport
            .send(RequestBuilder::get(ORDER_BY_TRACK_PATH).query_param("t", track))
    }

    pub fn list(&self, filter: ListOrders) -> Result<ApiResponse, HarnessError> {
        let mut request = RequestBuilder::get(ORDERS_PATH);
        if let Some(courier_id) = filter.courier_id {
            request = request.query_param("courierId", courier_id);
        }
        if let Some(limit) = filter.limit {
            request = request.query_param("limit", limit.to_string());
        }
        if let Some(page) = filter.page {
            request = request.query_param("page", page.to_string());
        }
        self.transport.send(request)
    }

    pub fn accept(
        &self,
        order_id: Option<OrderId>,
        courier_id: Option<CourierId>,
    ) -> Result<ApiResponse, HarnessError> {
        self.transport.send(
            RequestBuilder::put(ORDER_ACCEPT_PATH)
                .path_param("id", order_id)
                .query_param("courierId", courier_id),
        )
    }

    pub fn finish(&self, order_id: Option<OrderId>) -> Result<ApiResponse, HarnessError> {
        self.transport
            .send(RequestBuilder::put(ORDER_FINISH_PATH).path_param("id", order_id))
    }

    pub fn cancel(&self, track: Option<Track>) -> Result<ApiResponse, HarnessError> {
        self.transport
            .send(RequestBuilder::put(ORDER_CANCEL_PATH).query_param("track", track))
    }
}
