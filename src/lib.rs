//! # ELink Client
//!
//! A Rust client for the NCBI EUtils ELink and EGQuery operations.
//!
//! ELink answers with a differently shaped XML document for every `cmd`
//! ("link mode"). This crate parses each of them into one tagged
//! [`LinkResult`], so callers match on a [`LinkPayload`] variant instead of
//! walking mode-specific XML.
//!
//! ## Features
//!
//! - **Mode dispatch**: `neighbor`, `neighbor_score`, `neighbor_history`,
//!   `acheck`, `ncheck`, `lcheck`, `llinks`, `llinkslib` and `prlinks`, with a
//!   raw-document fallback for anything else
//! - **Global query**: per-database hit counts from EGQuery
//! - **Diagnostics**: recoverable problems are returned as [`LinkWarning`]s
//!   and logged through `tracing`; fatal ones are [`ELinkError`]s
//! - **Polite transport**: NCBI rate limits, retries with backoff, and
//!   `tool`/`email`/`api_key` identification on every request
//!
//! ## Quick Start
//!
//! ### Parsing a document you already have
//!
//! ```
//! use elink_client::{LinkPayload, XmlDocument, check_service_errors, parse_link};
//!
//! let xml = r#"<eLinkResult><LinkSet>
//!   <DbFrom>pubmed</DbFrom>
//!   <IdList><Id>20210808</Id></IdList>
//!   <LinkSetDb>
//!     <DbTo>pubmed</DbTo>
//!     <LinkName>pubmed_pubmed</LinkName>
//!     <Link><Id>20210808</Id><Score>45000000</Score></Link>
//!     <Link><Id>18278052</Id><Score>28349612</Score></Link>
//!   </LinkSetDb>
//! </LinkSet></eLinkResult>"#;
//!
//! let document = XmlDocument::parse(xml)?;
//! check_service_errors(&document)?;
//!
//! let parsed = parse_link(&document, "neighbor_score")?;
//! match &parsed.result.payload {
//!     LinkPayload::Neighbors(links) => {
//!         assert_eq!(links.scores_for("pubmed_pubmed"), Some(&[45000000, 28349612][..]));
//!     }
//!     other => panic!("unexpected payload {other:?}"),
//! }
//! # Ok::<(), elink_client::ELinkError>(())
//! ```
//!
//! ### Asking the service
//!
//! ```no_run
//! use elink_client::{ClientConfig, ELinkClient, ELinkRequest, LinkMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ELinkClient::with_config(
//!         ClientConfig::new().with_email("researcher@university.edu"),
//!     );
//!
//!     let request = ELinkRequest::new("pubmed", ["19880848", "19822630"])
//!         .db("all")
//!         .mode(LinkMode::ACheck);
//!     let parsed = client.elink(&request).await?;
//!     println!("{}", parsed.result);
//!
//!     let counts = client.global_query("asthma").await?;
//!     println!("{counts}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod document;
pub mod egquery;
pub mod elink;
pub mod error;
pub mod rate_limit;
pub mod retry;

// Re-export main types for convenience
pub use client::{ELinkClient, ELinkRequest};
pub use config::ClientConfig;
pub use document::{Element, FieldValue, Record, XmlDocument, check_service_errors};
pub use egquery::parse_global_query;
pub use elink::{
    AvailabilityCheck, CheckAttribute, DatabaseCountMap, IdCheck, LinkHistory, LinkIdMap,
    LinkMode, LinkPayload, LinkResult, LinkScoreMap, LinkWarning, Linkout, LinkoutSet,
    NeighborLinks, ParsedLink, ResponseShape, describe, describe_counts, describe_link_sets,
    parse_link, parse_link_sets,
};
pub use error::{ELinkError, Result};
pub use retry::RetryConfig;
