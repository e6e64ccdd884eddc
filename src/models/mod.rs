pub mod gateway;
pub mod stripe;
