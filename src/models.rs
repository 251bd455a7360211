pub mod scam;
pub mod schemes;
pub mod users;
