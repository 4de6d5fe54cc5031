pub mod calculator;
pub mod fetch;
pub mod layout;
pub mod output;
pub mod server;
pub mod store;
