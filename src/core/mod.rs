//! Core data types: the capability catalog, variant descriptors, build
//! options and the suffixes derived from them.

pub mod catalog;
pub mod options;
pub mod suffix;
pub mod variant;

pub use catalog::{SimdTier, TierInfo, TIERS};
pub use options::BuildOptions;
pub use suffix::SuffixSet;
pub use variant::{VariantDescriptor, VariantError};
