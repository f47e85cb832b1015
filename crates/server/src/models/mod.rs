//! Domain models for the CRM entities.
//!
//! These are the shapes handlers serialize into the response envelope. Field
//! names follow the wire format (camelCase) via serde renames; the password
//! hash never leaves the `db` layer inside a serializable type.

pub mod contact;
pub mod customer;
pub mod deal;
pub mod user;

pub use contact::Contact;
pub use customer::Customer;
pub use deal::{Deal, DealStats};
pub use user::{User, UserStats};
