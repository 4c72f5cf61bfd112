//! Domain models for the contacts application.

pub mod contact;
pub mod session;
pub mod user;

pub use contact::{Contact, NewContact};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
