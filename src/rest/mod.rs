pub mod request;
pub mod response;
pub mod transport;

pub use request::{build, ParamValue, PreparedRequest, RequestBuilder};
pub use response::{ApiResponse, MatchedResponse, ResponseSpec};
pub use transport::{Transport, TransportConfig};
