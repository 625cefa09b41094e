pub mod admin;
pub mod assistant;
pub mod blogs;
pub mod comments;
pub mod contact;
pub mod models;
pub mod newsletter;
pub mod routes;
pub mod validation;
