#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]

mod clock;
mod history;
mod options;
mod order_stat;
mod policy;
mod slots;
mod stats;
mod throughput;
mod tracker;

pub use clock::*;
pub use history::*;
pub use options::*;
pub use order_stat::*;
pub use policy::{DEFAULT_REWARD_TIERS, RewardTier};
pub use slots::SlotSnapshot;
pub use stats::*;
pub use throughput::*;
pub use tracker::SocketId;

/// `AddressResolver` trait and the name resolvers shipped with this crate.
pub mod resolver;

pub use resolver::{AddressResolver, GaiResolver, ResolveError, StaticResolver};

#[cfg(feature = "dns")]
#[cfg_attr(docsrs, doc(cfg(feature = "dns")))]
pub use resolver::{DnsResolver, DnsResolverOptions};
