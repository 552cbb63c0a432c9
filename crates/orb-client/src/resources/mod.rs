//! Endpoint groups, one module per API resource.
//!
//! Each module holds the params types of its endpoints and a borrowed
//! service handle returned by the matching [`OrbClient`](crate::OrbClient)
//! accessor.

pub mod alerts;
pub mod credits;
pub mod customers;
pub mod events;
pub mod invoices;
pub mod plans;
pub mod prices;
pub mod subscriptions;
