pub mod locking;
pub mod store;
pub mod transaction;

pub use locking::{FileLock, LockPolicy};
pub use store::{read_document, write_document};
pub use transaction::{with_transaction, Workspace};
