mod connection;
mod seed;

pub use connection::*;
pub use seed::*;
