use crate::jvm::class_file::{
    self, expect_end, Attribute, AttributeLike, BytecodeArray, BytecodeIndex, ConstantPool,
    Deserialize, ExceptionHandler, LocalVariableTable, LOCAL_VARIABLE_TYPE_TABLE,
};
use crate::jvm::{BinaryName, Error, FieldType, ParseDescriptor};
use crate::util::Width;
use std::io::ErrorKind;

/// Editable representation of a method body
///
/// The bytecode itself is never decoded: only the local variable debug information is opened up
/// for editing. Since nothing gets inserted into the instruction stream, offsets baked into the
/// bytecode, the exception table, and stack map frames all stay valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub max_stack: u16,

    /// Raised on serialization if a local variable needs more slots
    pub max_locals: u16,

    pub bytecode: BytecodeArray,
    pub exception_table: Vec<ExceptionHandler>,

    /// Entries of every `LocalVariableTable` attribute, in order
    pub local_variables: Vec<LocalVariable>,

    /// Raw `LocalVariableTypeTable` attributes
    pub local_variable_types: Vec<Attribute>,

    /// Every other code attribute, untouched
    pub attributes: Vec<Attribute>,
}

/// Named local variable slot, live over a range of the bytecode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    /// Names are carried as-is: obfuscators are known to put arbitrary strings here
    pub name: String,
    pub descriptor: String,

    /// First instruction where the variable is live (inclusive)
    pub start: BytecodeIndex,

    /// End of the live range (exclusive)
    pub end: BytecodeIndex,

    /// Local variable slot
    pub index: u16,
}

impl Code {
    /// Label at the very start of the method, before the first instruction
    pub fn start_label(&self) -> BytecodeIndex {
        BytecodeIndex(0)
    }

    /// Label after the last instruction
    ///
    /// The length of the bytecode has already been checked to fit in a `u16` when parsing.
    pub fn end_label(&self) -> BytecodeIndex {
        BytecodeIndex(self.bytecode.0.len() as u16)
    }

    /// Drop all existing local variable debug information and replace it
    ///
    /// Generic signatures in `LocalVariableTypeTable` are keyed off the same slots and ranges as
    /// the entries being replaced, so they get dropped too.
    pub fn replace_local_variables(&mut self, local_variables: Vec<LocalVariable>) {
        self.local_variables = local_variables;
        self.local_variable_types.clear();
    }

    pub(crate) fn parse(code: class_file::Code, constants: &ConstantPool) -> Result<Code, Error> {
        if code.code_array.0.len() > u16::MAX as usize {
            let msg = format!("Code array of {} bytes is too long", code.code_array.0.len());
            return Err(Error::IoError(std::io::Error::new(ErrorKind::InvalidData, msg)));
        }

        let mut local_variables = vec![];
        let mut local_variable_types = vec![];
        let mut attributes = vec![];

        for attribute in code.attributes {
            let name = constants.utf8(attribute.name_index)?;
            if name == LocalVariableTable::NAME {
                let table: LocalVariableTable = decode_attribute(&attribute)?;
                for local in table.0 {
                    local_variables.push(LocalVariable::parse(local, constants)?);
                }
            } else if name == LOCAL_VARIABLE_TYPE_TABLE {
                local_variable_types.push(attribute);
            } else {
                attributes.push(attribute);
            }
        }

        Ok(Code {
            max_stack: code.max_stack,
            max_locals: code.max_locals,
            bytecode: code.code_array,
            exception_table: code.exception_table,
            local_variables,
            local_variable_types,
            attributes,
        })
    }

    pub(crate) fn serialize(self, constants: &mut ConstantPool) -> Result<class_file::Code, Error> {
        let mut max_locals = self.max_locals;
        let mut table = vec![];
        for local in self.local_variables {
            max_locals = max_locals.max(local.slot_end());
            table.push(local.serialize(constants)?);
        }

        let mut attributes = self.attributes;
        if !table.is_empty() {
            attributes.push(constants.get_attribute(LocalVariableTable(table))?);
        }
        attributes.extend(self.local_variable_types);

        Ok(class_file::Code {
            max_stack: self.max_stack,
            max_locals,
            code_array: self.bytecode,
            exception_table: self.exception_table,
            attributes,
        })
    }
}

impl LocalVariable {
    /// First slot after the ones this variable occupies (`long` and `double` take two)
    fn slot_end(&self) -> u16 {
        // Debug information isn't verified by the JVM, so an unreadable descriptor counts as one
        let width = FieldType::<BinaryName>::parse(&self.descriptor).map_or(1, |ty| ty.width());
        self.index.saturating_add(width as u16)
    }

    fn parse(local: class_file::LocalVariable, constants: &ConstantPool) -> Result<Self, Error> {
        let end = local.start_pc.0.checked_add(local.length).ok_or_else(|| {
            let msg = format!(
                "Local variable range {}+{} overflows",
                local.start_pc.0, local.length
            );
            Error::IoError(std::io::Error::new(ErrorKind::InvalidData, msg))
        })?;
        Ok(LocalVariable {
            name: constants.utf8(local.name_index)?.into_owned(),
            descriptor: constants.utf8(local.descriptor_index)?.into_owned(),
            start: local.start_pc,
            end: BytecodeIndex(end),
            index: local.index,
        })
    }

    fn serialize(self, constants: &mut ConstantPool) -> Result<class_file::LocalVariable, Error> {
        let length = self.end.0.checked_sub(self.start.0).ok_or_else(|| {
            let msg = format!("Local variable '{}' ends before it starts", self.name);
            Error::IoError(std::io::Error::new(ErrorKind::InvalidInput, msg))
        })?;
        Ok(class_file::LocalVariable {
            start_pc: self.start,
            length,
            name_index: constants.get_utf8(self.name)?,
            descriptor_index: constants.get_utf8(self.descriptor)?,
            index: self.index,
        })
    }
}

/// Decode the contents of an attribute, requiring that all of its bytes get used
pub(crate) fn decode_attribute<A: AttributeLike + Deserialize>(
    attribute: &Attribute,
) -> Result<A, Error> {
    let mut info: &[u8] = &attribute.info;
    let decoded = A::deserialize(&mut info).map_err(Error::IoError)?;
    expect_end(info, A::NAME).map_err(Error::IoError)?;
    Ok(decoded)
}

#[cfg(test)]
mod test {
    use super::*;

    fn local(name: &str, descriptor: &str, index: u16) -> LocalVariable {
        LocalVariable {
            name: String::from(name),
            descriptor: String::from(descriptor),
            start: BytecodeIndex(0),
            end: BytecodeIndex(4),
            index,
        }
    }

    fn body() -> Code {
        Code {
            max_stack: 2,
            max_locals: 1,
            bytecode: BytecodeArray(vec![0x03, 0x3b, 0x00, 0xb1]),
            exception_table: vec![],
            local_variables: vec![],
            local_variable_types: vec![],
            attributes: vec![],
        }
    }

    #[test]
    fn labels_span_the_bytecode() {
        let code = body();
        assert_eq!(code.start_label(), BytecodeIndex(0));
        assert_eq!(code.end_label(), BytecodeIndex(4));
    }

    #[test]
    fn max_locals_grows_to_fit() {
        let mut constants = ConstantPool::new();
        let mut code = body();
        code.local_variables = vec![local("a", "I", 0), local("b", "D", 1)];
        let encoded = code.serialize(&mut constants).unwrap();
        assert_eq!(encoded.max_locals, 3);
        assert_eq!(encoded.attributes.len(), 1);
    }

    #[test]
    fn unreadable_descriptor_takes_one_slot() {
        let mut constants = ConstantPool::new();
        let mut code = body();
        code.local_variables = vec![local("a", "Lbroken", 2), local("b", "J", 3)];
        assert_eq!(code.serialize(&mut constants).unwrap().max_locals, 5);

        let mut code = body();
        code.local_variables = vec![local("a", "Q", 4)];
        assert_eq!(code.serialize(&mut constants).unwrap().max_locals, 5);
    }

    #[test]
    fn max_locals_never_shrinks() {
        let mut constants = ConstantPool::new();
        let mut code = body();
        code.max_locals = 7;
        code.local_variables = vec![local("a", "I", 0)];
        assert_eq!(code.serialize(&mut constants).unwrap().max_locals, 7);
    }

    #[test]
    fn replacing_drops_generic_signatures() {
        let mut constants = ConstantPool::new();
        let mut code = body();
        code.local_variable_types.push(Attribute {
            name_index: constants.get_utf8(LOCAL_VARIABLE_TYPE_TABLE).unwrap(),
            info: vec![0, 0],
        });
        code.replace_local_variables(vec![local("a", "I", 0)]);
        assert!(code.local_variable_types.is_empty());
        assert_eq!(code.local_variables.len(), 1);
    }

    #[test]
    fn tables_round_trip() {
        let mut constants = ConstantPool::new();
        let mut code = body();
        code.local_variables = vec![local("this", "Lnet/minecraft/Foo;", 0), local("x", "J", 1)];
        let encoded = code.clone().serialize(&mut constants).unwrap();
        let decoded = Code::parse(encoded, &constants).unwrap();
        assert_eq!(decoded.local_variables, code.local_variables);
        assert_eq!(decoded.max_locals, 3);
    }

    #[test]
    fn inverted_range() {
        let mut constants = ConstantPool::new();
        let mut code = body();
        let mut backwards = local("a", "I", 0);
        backwards.start = BytecodeIndex(3);
        backwards.end = BytecodeIndex(1);
        code.local_variables = vec![backwards];
        assert!(matches!(
            code.serialize(&mut constants),
            Err(Error::IoError(_))
        ));
    }

    #[test]
    fn trailing_attribute_bytes() {
        let mut constants = ConstantPool::new();
        let attribute = Attribute {
            name_index: constants.get_utf8(LocalVariableTable::NAME).unwrap(),
            info: vec![0, 0, 0xff],
        };
        assert!(decode_attribute::<LocalVariableTable>(&attribute).is_err());
    }
}
