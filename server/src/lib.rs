pub mod api;
pub mod auth;
pub mod components;
pub mod credentials;
pub mod errors;
pub mod mail;
pub mod profile;
pub mod routes;
pub mod state;
pub mod store;
pub mod token;
