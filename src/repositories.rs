pub mod gateway;
pub mod users;
