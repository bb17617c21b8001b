pub mod agent;
pub mod errors;
pub mod invoker;
pub mod models;
pub mod providers;
pub mod systems;
