// Job application tracking: lifecycle rules, validation, persistence and HTTP handlers.

pub mod handlers;
pub mod lifecycle;
pub mod store;
pub mod validation;
