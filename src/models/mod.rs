pub mod courier;
pub mod ids;
pub mod order;

pub use courier::CourierCredentials;
pub use ids::{from_sentinel, CourierId, OrderId, Track};
pub use order::{Order, OrderColor, OrderHandle, OrderPage, OrderRecord, OrderStatus, PageInfo};
