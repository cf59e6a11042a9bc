//! Inject declared exceptions and parameter names into the classes of a jar
//!
//! The work is driven by a mapping file keyed by method signature (see [`mappings`]). Every
//! class in the input archive is decoded, has its methods rewritten by an [`inject::Injector`],
//! and is written into the output archive (see [`archive`]). Everything else in the archive is
//! copied through untouched.

pub mod archive;
pub mod inject;
pub mod jvm;
pub mod mappings;
pub mod util;
