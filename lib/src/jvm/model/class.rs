use crate::jvm::class_file::{ClassConstantIndex, ClassFile, ConstantIndex, ConstantPool};
use crate::jvm::model::Method;
use crate::jvm::{BinaryName, Error, Name};

/// Editable representation of a class
///
/// Only methods are opened up for editing. Everything else stays in the parsed [`ClassFile`] and
/// is written back as it was read.
#[derive(Debug, Clone)]
pub struct Class {
    /// Name of the current class
    pub name: BinaryName,

    /// Name of the superclass (only `java/lang/Object` has none)
    pub super_name: Option<BinaryName>,

    /// Methods, in declaration order
    pub methods: Vec<Method>,

    /// Rest of the class (its `methods` are always empty)
    class_file: ClassFile,
}

impl Class {
    /// Decode a class from the bytes of a class file
    pub fn parse(bytes: &[u8]) -> Result<Class, Error> {
        let mut class_file = ClassFile::parse(bytes)?;

        let name = class_name(&class_file.constants, class_file.this_class)?;
        let super_name = if class_file.super_class.0 == ConstantIndex(0) {
            None
        } else {
            Some(class_name(&class_file.constants, class_file.super_class)?)
        };

        let methods = std::mem::take(&mut class_file.methods)
            .into_iter()
            .map(|method| Method::parse(method, &class_file.constants))
            .collect::<Result<Vec<Method>, Error>>()?;

        Ok(Class {
            name,
            super_name,
            methods,
            class_file,
        })
    }

    /// Encode the class back into the bytes of a class file
    ///
    /// New constants are appended to the end of the existing pool, so every index used by
    /// bytecode or by untouched attributes stays valid.
    pub fn serialize(self) -> Result<Vec<u8>, Error> {
        let mut class_file = self.class_file;
        class_file.methods = self
            .methods
            .into_iter()
            .map(|method| method.serialize(&mut class_file.constants))
            .collect::<Result<_, Error>>()?;
        class_file.to_bytes()
    }
}

fn class_name(constants: &ConstantPool, index: ClassConstantIndex) -> Result<BinaryName, Error> {
    let name = constants.class_name(index)?;
    BinaryName::from_string(name.into_owned()).map_err(Error::BadName)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_file::{
        Attribute, BytecodeArray, Code as CodeAttribute, Method as MethodInfo, Version,
    };
    use crate::jvm::model::LocalVariable;
    use crate::jvm::{ClassAccessFlags, MethodAccessFlags, UnqualifiedName};

    fn sample_class() -> Vec<u8> {
        let mut constants = ConstantPool::new();
        let this_class = constants.get_class("net/minecraft/Sample").unwrap();
        let super_class = constants.get_class("java/lang/Object").unwrap();

        let code = CodeAttribute {
            max_stack: 0,
            max_locals: 1,
            code_array: BytecodeArray(vec![0xb1]),
            exception_table: vec![],
            attributes: vec![],
        };
        let concrete = MethodInfo {
            access_flags: MethodAccessFlags::PUBLIC,
            name_index: constants.get_utf8("func_10_a").unwrap(),
            descriptor_index: constants.get_utf8("(J)V").unwrap(),
            attributes: vec![constants.get_attribute(code).unwrap()],
        };
        let deprecated = Attribute {
            name_index: constants.get_utf8("Deprecated").unwrap(),
            info: vec![],
        };
        let abstract_method = MethodInfo {
            access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::ABSTRACT,
            name_index: constants.get_utf8("func_11_b").unwrap(),
            descriptor_index: constants.get_utf8("()I").unwrap(),
            attributes: vec![deprecated],
        };

        ClassFile {
            version: Version::JAVA8,
            constants,
            access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::ABSTRACT,
            this_class,
            super_class,
            interfaces: vec![],
            fields: vec![],
            methods: vec![concrete, abstract_method],
            attributes: vec![],
        }
        .to_bytes()
        .unwrap()
    }

    #[test]
    fn parse_resolves_names() {
        let class = Class::parse(&sample_class()).unwrap();
        assert_eq!(class.name.as_str(), "net/minecraft/Sample");
        assert_eq!(class.super_name, Some(BinaryName::OBJECT));
        assert_eq!(class.methods.len(), 2);

        let concrete = &class.methods[0];
        assert_eq!(concrete.name.as_str(), "func_10_a");
        assert_eq!(concrete.descriptor, "(J)V");
        assert!(!concrete.is_static());
        assert!(concrete.exceptions.is_empty());
        assert!(concrete.code.is_some());

        let abstract_method = &class.methods[1];
        assert!(abstract_method.code.is_none());
        assert_eq!(abstract_method.attributes.len(), 1);
    }

    #[test]
    fn unmodified_class_is_stable() {
        let bytes = sample_class();
        let once = Class::parse(&bytes).unwrap().serialize().unwrap();
        assert_eq!(once, bytes);
        let twice = Class::parse(&once).unwrap().serialize().unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn edits_survive_a_round_trip() {
        let mut class = Class::parse(&sample_class()).unwrap();
        let method = &mut class.methods[0];
        method.exceptions = vec![BinaryName::EXCEPTION];
        let code = method.code.as_mut().unwrap();
        let (start, end) = (code.start_label(), code.end_label());
        code.local_variables = vec![
            LocalVariable {
                name: String::from("this"),
                descriptor: String::from("Lnet/minecraft/Sample;"),
                start,
                end,
                index: 0,
            },
            LocalVariable {
                name: String::from("p_10_1_"),
                descriptor: String::from("J"),
                start,
                end,
                index: 1,
            },
        ];

        let reparsed = Class::parse(&class.serialize().unwrap()).unwrap();
        let method = &reparsed.methods[0];
        assert_eq!(method.name, UnqualifiedName::from_string("func_10_a".into()).unwrap());
        assert_eq!(method.exceptions, vec![BinaryName::EXCEPTION]);

        let code = method.code.as_ref().unwrap();
        let names: Vec<&str> = code
            .local_variables
            .iter()
            .map(|local| local.name.as_str())
            .collect();
        assert_eq!(names, vec!["this", "p_10_1_"]);
        assert_eq!(code.local_variables[1].end.0, 1);

        // The `long` parameter in slot 1 needs slots 1 and 2
        assert_eq!(code.max_locals, 3);
    }

    #[test]
    fn missing_superclass() {
        let mut constants = ConstantPool::new();
        let this_class = constants.get_class("java/lang/Object").unwrap();
        let bytes = ClassFile {
            version: Version::JAVA8,
            constants,
            access_flags: ClassAccessFlags::PUBLIC,
            this_class,
            super_class: ClassConstantIndex(ConstantIndex(0)),
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            attributes: vec![],
        }
        .to_bytes()
        .unwrap();

        let class = Class::parse(&bytes).unwrap();
        assert_eq!(class.name, BinaryName::OBJECT);
        assert_eq!(class.super_name, None);
    }
}
