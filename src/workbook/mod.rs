//! Workbook container model
//!
//! This module provides the container classifier, the types that flow
//! through the extraction pipeline, and the crate's error type.

pub mod errors;
pub mod types;
pub mod container;
pub mod cfb;
pub(crate) mod constants;

pub use errors::{ExtractError, ExtractResult};
pub use types::{Anchor, DiscoveryMethod, ImageCandidate, ImageFormat};
pub use container::{classify, Container, ContainerKind};
pub use cfb::CfbHeader;
