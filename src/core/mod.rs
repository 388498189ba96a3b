//! Core module - fundamental types and utilities

pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod logging;
pub mod manager;
pub mod memory;
pub mod notification;
pub mod pagination;
pub mod validation;

pub use client::{Fetched, PortalClient, RemoteStore};
pub use config::{Config, ConfigError};
pub use entity::{Draft, Entity, EntityKind, FieldSpec, FieldType, ListRoute};
pub use error::{ErrorKind, PortalError};
pub use manager::{Confirm, Editor, EntityManager, Outcome};
pub use memory::MemoryStore;
pub use notification::{Notification, NotificationKind, Notifier};
pub use pagination::{window_of, PageRequest, PageState, PagedResult};
