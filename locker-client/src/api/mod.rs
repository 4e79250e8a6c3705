//! One module per backend resource; each function is a single HTTP call.

pub mod auth;
pub mod compartments;
pub mod locations;
pub mod lockers;
pub mod otp;
pub mod overview;
pub mod parcels;
pub mod pickup;
