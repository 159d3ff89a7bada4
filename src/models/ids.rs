use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Courier id, assigned by the service on the first successful login.
    CourierId
);
id_type!(
    /// Service-internal order handle. Only discoverable by looking the order
    /// up by its [`Track`].
    OrderId
);
id_type!(
    /// Client-facing order handle, assigned once at creation.
    Track
);

/// The service treats `0` as "parameter omitted". This is the only place that
/// convention is turned into an `Option`.
pub fn from_sentinel<T: From<i64>>(raw: i64) -> Option<T> {
    (raw != 0).then(|| T::from(raw))
}
