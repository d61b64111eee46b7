//! Key-value storage for the Roast & Ritual storefront engine.
//!
//! Host storage is modelled by the fallible [`KvBackend`] trait. Engine
//! components never talk to a backend directly: they go through [`KvStore`],
//! the adapter that swallows backend failures so that a broken or disabled
//! storage area can never halt the storefront.
//!
//! # Storage Backends
//!
//! - [`InMemoryKvBackend`] -- `HashMap`-based backend for tests and embedding
//! - [`FileKvBackend`] -- one file per key under a data directory
//! - [`UnavailableKvBackend`] -- every call fails (restricted storage mode)
//!
//! # Design Rules
//!
//! 1. `get` on a failing backend returns absent; callers use their default.
//! 2. `set`/`remove` never surface an error to the caller.
//! 3. The first failed write switches the adapter to memory-only mode;
//!    the session keeps working and the switch is observable via
//!    [`KvStore::mode`].
//! 4. The adapter never interprets values -- it is a pure string store.

pub mod adapter;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use adapter::{KvStore, StoreMode};
pub use error::{StoreError, StoreResult};
pub use file::FileKvBackend;
pub use memory::{InMemoryKvBackend, UnavailableKvBackend};
pub use traits::{validate_key, KvBackend};
