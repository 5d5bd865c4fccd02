//! Fleet management API
//!
//! Typed operations over the array REST API: fleets, fleet members,
//! volumes and hosts (all paginated), plus the host, volume and connection
//! creation exchanges.

mod client;
mod types;

pub use client::{select_member_array, FleetApi};
pub use types::{
    ConnectionSpec, Context, Fleet, FleetMember, HostSpec, Iqn, Reference, VolumeSpec,
};
