//! Network-inventory expansion into DHCP subnet configuration.
//!
//! This library turns structured network-inventory data (YAML site/VLAN
//! descriptions, CSV prefix inventories) into `subnet4` configuration
//! fragments for ISC DHCP and Kea servers.
//!
//! # Pipeline
//!
//! 1. [`inventory`] — load nested site → sub-site YAML into flat
//!    [`model::LogicalRow`] values
//! 2. [`expand`] — derive one subnet record per offset of an
//!    [`profiles::OffsetProfile`] (third-octet arithmetic, VRF and VLAN
//!    derivation)
//! 3. [`datafile`] — write/read the CSV intermediate file
//! 4. [`subnet`] — filter rows and build the per-subnet pool, relay and
//!    option-data blocks
//! 5. [`render`] — emit the `"subnet4":` JSON fragment and run summaries
//!
//! The `expand`, `subnets` and `generate` subcommands of the binary wire
//! these stages together; `generate` runs the whole pipeline in one
//! invocation.
//!
//! # Built on subnet-core
//!
//! All IPv4/CIDR arithmetic (network and broadcast derivation, address
//! indexing) lives in the generic `subnet-core` crate. Everything
//! DHCP-inventory-specific is contained in this crate.

pub mod datafile;
pub mod expand;
pub mod inventory;
pub mod model;
pub mod profiles;
pub mod render;
pub mod subnet;
