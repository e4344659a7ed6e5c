use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::mask::{broadcast_of, network_of};

/// Errors from constructing or indexing an [`Ipv4Net`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    /// Prefix length exceeds the 32 bits of an IPv4 address.
    #[error("prefix length /{0} is longer than 32 bits")]
    PrefixTooLong(u8),
    /// Input string was not `address/len`.
    #[error("invalid CIDR notation '{0}'")]
    InvalidCidr(String),
    /// Address part did not parse as a dotted quad.
    #[error("invalid IPv4 address '{0}'")]
    InvalidAddress(String),
    /// Requested address index falls outside the network.
    #[error("address index {index} is outside a /{prefix_len} network")]
    IndexOutOfRange { index: u64, prefix_len: u8 },
}

/// An IPv4 network in CIDR notation.
///
/// The stored address is always the network address: host bits present
/// in the input are masked off on construction, so `10.20.41.77/24`
/// and `10.20.41.0/24` construct the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv4Net {
    addr: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Net {
    /// Build a network from an address and prefix length.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self, NetError> {
        if prefix_len > 32 {
            return Err(NetError::PrefixTooLong(prefix_len));
        }
        Ok(Self {
            addr: network_of(addr, prefix_len),
            prefix_len,
        })
    }

    /// The network address (index 0).
    pub fn network(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// The highest address in the network.
    pub fn broadcast(&self) -> Ipv4Addr {
        broadcast_of(self.addr, self.prefix_len)
    }

    /// Total number of addresses covered, 2^(32 - prefix_len).
    pub fn num_addresses(&self) -> u64 {
        1u64 << (32 - self.prefix_len)
    }

    /// Address at `index` inside the network, 0 being the network
    /// address and `num_addresses() - 1` the broadcast address.
    pub fn addr_at(&self, index: u64) -> Result<Ipv4Addr, NetError> {
        if index >= self.num_addresses() {
            return Err(NetError::IndexOutOfRange {
                index,
                prefix_len: self.prefix_len,
            });
        }
        Ok(Ipv4Addr::from(u32::from(self.addr) + index as u32))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        network_of(addr, self.prefix_len) == self.addr
    }
}

impl FromStr for Ipv4Net {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr_part, len_part) = s
            .split_once('/')
            .ok_or_else(|| NetError::InvalidCidr(s.to_string()))?;
        let addr: Ipv4Addr = addr_part
            .parse()
            .map_err(|_| NetError::InvalidAddress(addr_part.to_string()))?;
        let prefix_len: u8 = len_part
            .parse()
            .map_err(|_| NetError::InvalidCidr(s.to_string()))?;
        Self::new(addr, prefix_len)
    }
}

impl fmt::Display for Ipv4Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

impl Serialize for Ipv4Net {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv4Net {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
