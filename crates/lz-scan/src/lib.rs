//! # lz-scan
//!
//! Discovery of license declarations in a directory tree.
//!
//! The [`Scanner`] walks a tree (following symlinks, visiting each real
//! directory once), parses every `licensezero.json` it finds through the
//! schema registry, and emits one [`Finding`] per declared offer. Package
//! identity comes from an ordered list of [`PackageProbe`]s.

pub mod error;
pub mod finding;
pub mod probe;
pub mod scanner;

pub use error::{Result, ScanError};
pub use finding::{Finding, PackageInfo};
pub use probe::{split_npm_name, NpmProbe, PackageProbe};
pub use scanner::{Scanner, DECLARATION_FILE};
