pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod transformer;
pub mod validation;
