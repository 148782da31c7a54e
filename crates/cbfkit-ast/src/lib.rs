//! cbfkit-ast - Conic problem model
//!
//! This crate provides the in-memory representation of a problem in the
//! Conic Benchmark Format: cone stacks for scalar variables and constraints,
//! PSD blocks, integrality and the sparse coefficient sections, together
//! with the index bounds every coefficient section must respect.
//!
//! # Example
//!
//! ```
//! use cbfkit_ast::{Cone, Document, LinEntry, ObjectiveSense};
//!
//! let mut doc = Document::new();
//! doc.sense = ObjectiveSense::Maximize;
//! doc.variables.push(Cone::NonNegative, 2);
//! doc.constraints.push(Cone::Zero, 1);
//! doc.con_lin.push(LinEntry::new(0, 1, 3.0));
//!
//! assert_eq!(doc.num_variables(), 2);
//! assert!(doc.validate().is_ok());
//! ```

pub mod bounds;
pub mod cone;
pub mod coord;
pub mod document;
pub mod stack;

use thiserror::Error;

pub use bounds::{Bounds, BoundsViolation};
pub use cone::{Cone, ObjectiveSense};
pub use coord::{
    ConstEntry, LinEntry, ObjLinEntry, ObjPsdEntry, PsdEntry, PsdMapConstEntry, PsdMapEntry,
};
pub use document::{Document, Summary};
pub use stack::{ConeBlock, ConeStack};

/// Newest format version this crate understands
pub const MAX_SUPPORTED_VERSION: u32 = 2;

/// A cone or objective-sense token with no mapping
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {kind} token: {token:?}")]
pub struct UnknownToken {
    /// "cone" or "objective sense"
    pub kind: &'static str,
    pub token: String,
}

impl UnknownToken {
    pub(crate) fn cone(token: &str) -> Self {
        Self {
            kind: "cone",
            token: token.to_string(),
        }
    }

    pub(crate) fn sense(token: &str) -> Self {
        Self {
            kind: "objective sense",
            token: token.to_string(),
        }
    }
}
