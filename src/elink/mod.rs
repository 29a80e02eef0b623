//! ELink response handling
//!
//! [`parse_link`] turns a validated ELink document into a [`LinkResult`]
//! whose payload variant depends on the [`LinkMode`] that produced it.

pub mod display;
pub mod mode;
pub mod models;
pub mod parser;

pub use display::{describe, describe_counts, describe_link_sets};
pub use mode::{LinkMode, ResponseShape};
pub use models::{
    AvailabilityCheck, CheckAttribute, DatabaseCountMap, IdCheck, LinkHistory, LinkIdMap,
    LinkPayload, LinkResult, LinkScoreMap, LinkWarning, Linkout, LinkoutSet, NeighborLinks,
    ParsedLink,
};
pub use parser::{parse_link, parse_link_sets};
