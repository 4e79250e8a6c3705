//! Wizard state for each flow.
//!
//! A store owns the collected form values and whatever the backend returned,
//! and exposes one async method per user action. Pages render from the
//! public fields and call the actions; nothing here prints.

pub mod admin;
pub mod courier;
pub mod deposit;
pub mod pickup;
pub mod recipient;

pub use admin::{AdminStore, SetupStep};
pub use courier::{CourierStep, CourierStore, DepositSummary};
pub use deposit::{DepositStep, DepositStore};
pub use pickup::{PickupStep, PickupStore};
pub use recipient::RecipientStore;
