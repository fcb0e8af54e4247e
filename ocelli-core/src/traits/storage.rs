//! Asset storage trait (on-board filesystem holding config and sprites)

use crate::config::RawConfig;

/// Errors that can occur with asset storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Filesystem could not be mounted
    MountFailed,
    /// Flash read failed
    Io,
}

/// Trait for the read-only asset filesystem
pub trait AssetStorage {
    /// Mount the filesystem
    fn mount(&mut self) -> Result<(), StorageError>;

    /// Check whether a file exists
    fn exists(&self, path: &str) -> bool;

    /// Read and parse the configuration document
    ///
    /// Returns `Ok(None)` if it is missing or unparsable and
    /// [`StorageError::Io`] if the read itself failed. Either way the caller
    /// falls back to defaults.
    fn load_config(&mut self) -> Result<Option<RawConfig>, StorageError>;
}
