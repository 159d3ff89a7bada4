use crate::error::HarnessError;
use crate::models::courier::CourierCredentials;
use crate::models::ids::CourierId;
use crate::rest::{ApiResponse, ParamValue, RequestBuilder, Transport};

const COURIER_PATH: &str = "/courier";
const COURIER_LOGIN_PATH: &str = "/courier/login";
const COURIER_BY_ID_PATH: &str = "/courier/{id}";
const COURIER_ORDERS_COUNT_PATH: &str = "/courier/{id}/ordersCount";

#[derive(Debug, Clone)]
pub struct CourierClient {
    transport: Transport,
}

impl CourierClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn create(&self, courier: &CourierCredentials) -> Result<ApiResponse, HarnessError> {
        self.transport
            .send(RequestBuilder::post(COURIER_PATH).json(courier)?)
    }

    /// Sends only login and password, whatever else `courier` carries.
    pub fn login(&self, courier: &CourierCredentials) -> Result<ApiResponse, HarnessError> {
        self.transport
            .send(RequestBuilder::post(COURIER_LOGIN_PATH).json(&courier.login_form())?)
    }

    pub fn delete_by_id(&self, id: CourierId) -> Result<ApiResponse, HarnessError> {
        self.delete(ParamValue::from(id))
    }

    /// Deletes with an unchecked identifier, including the empty string.
    pub fn delete_by_raw_id(&self, id: impl Into<String>) -> Result<ApiResponse, HarnessError> {
        self.delete(ParamValue::raw(id))
    }

    pub fn orders_count(&self, id: CourierId) -> Result<ApiResponse, HarnessError> {
        self.transport
            .send(RequestBuilder::get(COURIER_ORDERS_COUNT_PATH).path_param("id", id))
    }

    fn delete(&self, id: ParamValue) -> Result<ApiResponse, HarnessError> {
        self.transport
            .send(RequestBuilder::delete(COURIER_BY_ID_PATH).path_param("id", id))
    }
}
