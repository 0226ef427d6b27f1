//! Auth module: domain types, credential hasher, token service, repository
//! abstraction and the use-case service that ties them together.

pub mod domain;
pub mod errors;
pub mod hasher;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use errors::AuthError;
pub use service::AuthService;
