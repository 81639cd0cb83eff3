//! Embedded JSON-backed dictionary of localized message strings.
//!
//! Records are keyed by a code and persisted as one JSON array per file.
//! [`core::dictionary::Dictionary`] keeps one locale per file;
//! [`core::localized::LocalizedDictionary`] keeps every locale of a
//! namespace in one file. Either can be used directly, or a localized
//! store can be moved behind a [`runtime::handle::SharedDictionary`] so
//! many callers share one writer.
//!
//! # Examples
//!
//! Instance-scoped usage:
//! ```no_run
//! use msgdict::{config::DictionaryConfig, core::dictionary::Dictionary};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut dict = Dictionary::open(DictionaryConfig::default().with_directory("locales"));
//! let outcome = dict
//!     .add("123", "Insert data successfully!", Some(json!({"user": "doe"})))
//!     .await
//!     .expect("add");
//! assert!(outcome.status);
//! assert_eq!(dict.get("123").code, "123");
//! assert!(dict.get("missing").is_unknown());
//! # }
//! ```
//!
//! Shared usage through a registry:
//! ```no_run
//! use msgdict::{
//!     config::LocalizedConfig,
//!     runtime::{handle::RuntimeConfig, registry::DictionaryRegistry},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let registry = DictionaryRegistry::new(RuntimeConfig::default());
//! let cfg = LocalizedConfig::new("locales").with_namespace("global");
//! let a = registry.open(cfg.clone()).await.expect("open");
//! let b = registry.open(cfg).await.expect("open");
//! a.add("007", "en", "hello", None).await.expect("add");
//! assert_eq!(b.list().await.expect("list").len(), 1);
//! registry.shutdown_all().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Store configuration and path resolution.
pub mod config;
/// Tables and store variants.
pub mod core;
/// JSON file persistence.
pub mod persist;
/// Record and message types with input validation.
pub mod record;
/// Shared single-writer runtime.
pub mod runtime;
/// Shared aliases, sentinels and the outcome envelope.
pub mod types;
