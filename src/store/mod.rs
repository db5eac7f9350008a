//! SQLite-backed persistence for the domain surface.
//!
//! One store struct per area, each opening the shared database file per
//! call. Credential records live in [`crate::auth::user_store`].

pub mod appointments;
pub mod contact;
pub mod documents;

pub use appointments::AppointmentStore;
pub use contact::ContactStore;
pub use documents::DocumentStore;
