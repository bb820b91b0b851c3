pub mod assistants;
pub mod base;
pub mod configs;
pub mod factory;
pub mod mock;
pub mod responses;
