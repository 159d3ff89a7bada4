pub mod courier;
pub mod order;

pub use courier::CourierClient;
pub use order::{ListOrders, OrderClient};
