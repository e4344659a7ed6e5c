//! Generic IPv4 subnet arithmetic primitives used by higher-level tools.

pub mod mask;
pub mod net;

pub use mask::{broadcast_of, network_of, prefix_mask};
pub use net::{Ipv4Net, NetError};
