//! Account authentication business layer.
//! - Credential hashing and token issuance live beside the use cases that need them.
//! - Persistence is reached only through the `AccountRepository` trait.

pub mod auth;
