//! Read, edit, and write JVM classes
//!
//! There are two layers:
//!
//!   - [`class_file`] is a faithful binary codec for the class file format. Attributes that are
//!     never edited are carried through as raw bytes.
//!   - [`model`] is an editable view of one class: methods expose their names, descriptors,
//!     declared exceptions and code bodies (with local variable debug information) in terms of
//!     names rather than constant pool indices.
//!
//! ### Simple example
//!
//! Consider a class `net/minecraft/Point` with a single `static void func_1_a(int)` method
//! whose body is just `return`. Adding parameter names and a `throws` clause to it goes as
//! follows:
//!
//! ```
//! use mcinjector::jvm::class_file::{BytecodeArray, ClassFile, Code, ConstantPool, Method, Version};
//! use mcinjector::jvm::model::{Class, LocalVariable};
//! use mcinjector::jvm::*;
//!
//! # fn inject() -> Result<(), Error> {
//! // Assemble the class file from scratch
//! let mut constants = ConstantPool::new();
//! let this_class = constants.get_class("net/minecraft/Point")?;
//! let super_class = constants.get_class("java/lang/Object")?;
//! let code = Code {
//!     max_stack: 0,
//!     max_locals: 1,
//!     code_array: BytecodeArray(vec![0xb1]),
//!     exception_table: vec![],
//!     attributes: vec![],
//! };
//! let method = Method {
//!     access_flags: MethodAccessFlags::STATIC,
//!     name_index: constants.get_utf8("func_1_a")?,
//!     descriptor_index: constants.get_utf8("(I)V")?,
//!     attributes: vec![constants.get_attribute(code)?],
//! };
//! let class_file = ClassFile {
//!     version: Version::JAVA8,
//!     constants,
//!     access_flags: ClassAccessFlags::PUBLIC,
//!     this_class,
//!     super_class,
//!     interfaces: vec![],
//!     fields: vec![],
//!     methods: vec![method],
//!     attributes: vec![],
//! };
//! let bytes: Vec<u8> = class_file.to_bytes()?;
//!
//! // Edit the method through the model
//! let mut class = Class::parse(&bytes)?;
//! let method = &mut class.methods[0];
//! method.exceptions = vec![BinaryName::EXCEPTION];
//! if let Some(code) = method.code.as_mut() {
//!     let (start, end) = (code.start_label(), code.end_label());
//!     code.local_variables = vec![LocalVariable {
//!         name: String::from("p_1_0_"),
//!         descriptor: String::from("I"),
//!         start,
//!         end,
//!         index: 0,
//!     }];
//! }
//!
//! // Encode it back into bytes
//! let edited: Vec<u8> = class.serialize()?;
//! let reparsed = Class::parse(&edited)?;
//! assert_eq!(reparsed.methods[0].exceptions, vec![BinaryName::EXCEPTION]);
//! # Ok(())
//! # }
//! # inject().unwrap();
//! ```

mod access_flags;
pub mod class_file;
mod descriptors;
mod errors;
pub mod model;
mod names;

pub use access_flags::*;
pub use descriptors::*;
pub use errors::*;
pub use names::*;
