//! Route handlers, one module per resource.
//!
//! Every handler is generic over the [`PortalStore`](una_core::store::PortalStore)
//! backend and takes the shared [`ApiState`](crate::ApiState).

pub mod applications;
pub mod contacts;
pub mod hours;
pub mod laboratories;
pub mod messages;
pub mod projects;
pub mod publications;
pub mod researchers;
pub mod tracks;
