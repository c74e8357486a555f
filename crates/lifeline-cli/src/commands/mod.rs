pub mod admin;
pub mod auth;
pub mod banks;
mod dispatch;
pub mod donors;
pub mod filters;
pub mod schema;

pub use dispatch::dispatch;
