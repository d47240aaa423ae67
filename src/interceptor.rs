//! Request/response interceptors attached to every [`ClientInstance`](crate::client::ClientInstance).

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
