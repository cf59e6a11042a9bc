//! Editable representation of classes
//!
//! This is the representation to use while rewriting the metadata of an existing class. Constant
//! pool indices are resolved into names on the way in and interned again on the way out, so that
//! edits never need to touch the constant pool directly.
//!
//!   - __Class__ is represented using [`Class`]
//!   - __Method__ is represented using [`Method`]
//!   - __Method body__ is represented using [`Code`]
//!
//! Fields, class attributes, and every attribute that isn't edited stay in their
//! [`class_file`](crate::jvm::class_file) form and are written back byte for byte.

mod class;
mod code;
mod method;

pub use class::*;
pub use code::*;
pub use method::*;
