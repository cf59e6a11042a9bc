//! Mapping files: which exceptions and parameter names each method should get
//!
//! A mapping file is a properties file with one line per method:
//!
//! ```text
//! #max index=1024
//! net/minecraft/Foo.func_123_a(I)V=java/lang/Exception|value
//! net/minecraft/Foo.<init>(Ljava/lang/String;)V=|p_i1023_1_
//! ```
//!
//! Keys are [`SignatureKey`]s and values are [`MappingEntry`]s. The optional `max index` header
//! records where the constructor counter stopped, so a later run can continue from there.

mod key;
mod properties;
mod table;

pub use key::*;
pub use table::*;
