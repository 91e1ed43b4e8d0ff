pub mod channel;
pub mod context;
pub mod error;
pub mod logging;
pub mod packets;
pub mod path;
pub mod responses;
