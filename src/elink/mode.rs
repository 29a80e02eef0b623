use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ELinkError;

/// ELink `cmd` values this crate knows how to parse
///
/// # Example
///
/// ```
/// use elink_client::{LinkMode, ResponseShape};
///
/// let mode: LinkMode = "prlinks".parse()?;
/// assert_eq!(mode, LinkMode::PrLinks);
/// assert_eq!(mode.shape(), ResponseShape::Linkout);
/// assert_eq!(LinkMode::from_cmd("bogus"), None);
/// # Ok::<(), elink_client::ELinkError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    /// Linked identifiers in the target database
    Neighbor,
    /// Linked identifiers with similarity scores
    NeighborScore,
    /// Linked searches stored on the history server
    NeighborHistory,
    /// Summary of every link available for each identifier
    #[serde(rename = "acheck")]
    ACheck,
    /// Whether each identifier has any neighbors
    #[serde(rename = "ncheck")]
    NCheck,
    /// Whether each identifier has any LinkOut links
    #[serde(rename = "lcheck")]
    LCheck,
    /// LinkOut URLs for non-library providers
    #[serde(rename = "llinks")]
    LLinks,
    /// LinkOut URLs for all providers, libraries included
    #[serde(rename = "llinkslib")]
    LLinksLib,
    /// Primary LinkOut (full-text provider) URLs
    #[serde(rename = "prlinks")]
    PrLinks,
}

/// Document layout families; several modes share one layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseShape {
    Neighbor,
    History,
    Availability,
    Check,
    Linkout,
}

impl LinkMode {
    pub const ALL: [LinkMode; 9] = [
        LinkMode::Neighbor,
        LinkMode::NeighborScore,
        LinkMode::NeighborHistory,
        LinkMode::ACheck,
        LinkMode::NCheck,
        LinkMode::LCheck,
        LinkMode::LLinks,
        LinkMode::LLinksLib,
        LinkMode::PrLinks,
    ];

    /// Look up a mode by its wire `cmd` value
    pub fn from_cmd(cmd: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_cmd() == cmd)
    }

    /// The `cmd` query parameter for this mode
    pub fn as_cmd(self) -> &'static str {
        match self {
            LinkMode::Neighbor => "neighbor",
            LinkMode::NeighborScore => "neighbor_score",
            LinkMode::NeighborHistory => "neighbor_history",
            LinkMode::ACheck => "acheck",
            LinkMode::NCheck => "ncheck",
            LinkMode::LCheck => "lcheck",
            LinkMode::LLinks => "llinks",
            LinkMode::LLinksLib => "llinkslib",
            LinkMode::PrLinks => "prlinks",
        }
    }

    pub fn shape(self) -> ResponseShape {
        match self {
            LinkMode::Neighbor | LinkMode::NeighborScore => ResponseShape::Neighbor,
            LinkMode::NeighborHistory => ResponseShape::History,
            LinkMode::ACheck => ResponseShape::Availability,
            LinkMode::NCheck | LinkMode::LCheck => ResponseShape::Check,
            LinkMode::LLinks | LinkMode::LLinksLib | LinkMode::PrLinks => ResponseShape::Linkout,
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cmd())
    }
}

impl FromStr for LinkMode {
    type Err = ELinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cmd(s.trim())
            .ok_or_else(|| ELinkError::InvalidQuery(format!("Unknown ELink cmd: {s}")))
    }
}
