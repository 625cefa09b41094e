pub mod defs;
pub mod store;

// Object style note:
// The store and mailer are external collaborators. Handlers only ever see
// them through `Arc<dyn SiteStore>` / `Arc<dyn Mailer>`, so a test double or
// a different backend can be swapped in without touching request handling.

pub use defs::*;
pub use store::{MailError, Mailer, SiteStore, StoreError, StoreResult};
