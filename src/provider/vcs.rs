//! Version-control remote capability.
//!
//! The host only defines the contract; protocol handling (git transports,
//! forge HTTP APIs) is supplied by concrete plugins. Operations surface as
//! promises so callers compose them like any other asynchronous work.

use crate::promise::Promise;
use crate::provider::Provider;

pub trait VcsRemote: Provider {
    /// Remote name, e.g. `origin`.
    fn name(&self) -> String;

    /// Remote URI, if the backend exposes one.
    fn uri(&self) -> Option<String>;

    /// Fetch from the remote.
    fn fetch(&self) -> Promise<()>;

    /// Push to the remote.
    fn push(&self) -> Promise<()>;
}
