#![forbid(unsafe_code)]

pub mod keys;
pub mod kv;
pub mod repository;
pub mod sqlite;

pub use kv::KvRepository;
pub use repository::{
    CredentialRepository, InMemoryStore, KeyValueStore, LibraryRepository, PreferencesRepository,
    ProgressRepository, Storage, StorageError,
};
