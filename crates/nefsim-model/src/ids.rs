// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Typed ids for network objects
//!
//! Ids are dense indices into the owning [`Network`](crate::Network) arenas
//! and are never reused within a network.

use core::fmt;

macro_rules! network_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

network_id!(
    /// Identifies an ensemble within its network.
    EnsembleId,
    "ens"
);
network_id!(
    /// Identifies a node within its network.
    NodeId,
    "node"
);
network_id!(
    /// Identifies a connection within its network.
    ConnectionId,
    "conn"
);
network_id!(
    /// Identifies a probe within its network.
    ProbeId,
    "probe"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(EnsembleId(3).to_string(), "ens3");
        assert_eq!(NodeId(0).to_string(), "node0");
        assert_eq!(ConnectionId(12).to_string(), "conn12");
        assert_eq!(ProbeId(1).to_string(), "probe1");
    }
}
