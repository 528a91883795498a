//! caltrack Core Library
//!
//! This crate provides the core of caltrack, a small calorie tracker:
//! an item store, its persisted snapshot, and the coordinator that turns
//! user intents into store mutations and view updates.
//!
//! # Architecture
//!
//! - **ItemStore**: authoritative in-memory items plus the current selection
//! - **ItemPersistence**: mirrors the items to one JSON slot after every change
//! - **Renderer**: contract for whatever surface displays the items
//! - **Coordinator**: owns all three and dispatches [`Intent`]s
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let persistence = ItemPersistence::new(config.items_slots());
//! let mut coordinator = Coordinator::new(persistence, my_renderer);
//! coordinator.start();
//!
//! coordinator.dispatch(Intent::SubmitNew(FormInput::new("Cookie", "400")))?;
//! ```
//!
//! # Modules
//!
//! - `coordinator`: intent dispatch (main entry point)
//! - `store`: in-memory item store
//! - `models`: items, ids, and validated input
//! - `view`: renderer contract, intents, form modes
//! - `storage`: snapshot persistence and slot backends
//! - `config`: application configuration

pub mod config;
pub mod coordinator;
pub mod models;
pub mod storage;
pub mod store;
pub mod view;

pub use config::Config;
pub use coordinator::{Coordinator, IntentError};
pub use models::{parse_calories, Item, ItemId, ItemInput, ValidationError};
pub use storage::{FileSlots, ItemPersistence, MemorySlots, SlotBackend, StorageError};
pub use store::{ItemStore, StoreError};
pub use view::{FormInput, FormMode, Intent, Renderer};
