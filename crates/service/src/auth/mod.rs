//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Username/password login issuing HS256 JSON Web Tokens, and verification of those tokens.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
