//! Client registry for the agencyzen platform.
//!
//! This crate provides:
//! - Client records (`Client`, `ClientStatus`)
//! - An in-memory registry with search and persona assignment
//! - The dashboard's canned client fixtures (`sample_clients`)
//!
//! # Example
//!
//! ```
//! use agencyzen_client::{Client, ClientRegistry, ClientStatus};
//!
//! let mut registry = ClientRegistry::new();
//! let client = Client::new(
//!     "João Silva",
//!     "Tech Solutions LTDA",
//!     "joao@techsolutions.com",
//!     "+55 11 99999-1234",
//! )
//! .with_status(ClientStatus::Active);
//! let id = registry.add(client).expect("name and email are set");
//!
//! registry.assign(id, "whatsapp").expect("client exists");
//! assert!(registry.get(id).expect("client exists").has_agent("whatsapp"));
//! assert_eq!(registry.search("tech").len(), 1);
//! ```

pub mod client;
pub mod error;
pub mod registry;
pub mod sample;

// Re-export main types at crate root
pub use client::{Client, ClientStatus};
pub use error::ClientError;
pub use registry::{ASSIGNABLE_AGENTS, ClientRegistry};
pub use sample::sample_clients;
