// Adapters layer: concrete implementations for the remote API and local storage.

pub mod slack;
pub mod storage;

pub use slack::SlackDirectoryFetcher;
pub use storage::LocalStorage;
