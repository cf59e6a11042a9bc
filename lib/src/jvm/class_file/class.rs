use crate::jvm::class_file::{
    expect_end, Attribute, ClassConstantIndex, ConstantPool, Deserialize, Field, Method,
    Serialize, Version,
};
use crate::jvm::{ClassAccessFlags, Error};
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::ErrorKind;

/// Representation of the [`class` file format of the JVM][0]
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub version: Version,
    pub constants: ConstantPool,
    pub access_flags: ClassAccessFlags,
    pub this_class: ClassConstantIndex,
    pub super_class: ClassConstantIndex,
    pub interfaces: Vec<ClassConstantIndex>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Magic header bytes that go at the front of the serialized class file
    const MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

    /// Decode a complete class file, rejecting anything left over after the last attribute
    pub fn parse(mut bytes: &[u8]) -> Result<ClassFile, Error> {
        let class_file = ClassFile::deserialize(&mut bytes).map_err(Error::IoError)?;
        expect_end(bytes, "class file").map_err(Error::IoError)?;
        Ok(class_file)
    }

    /// Encode the class file into a fresh buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = vec![];
        self.serialize(&mut bytes).map_err(Error::IoError)?;
        Ok(bytes)
    }
}

impl Serialize for ClassFile {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&ClassFile::MAGIC)?;
        self.version.serialize(writer)?;
        self.constants.serialize(writer)?;
        self.access_flags.serialize(writer)?;
        self.this_class.serialize(writer)?;
        self.super_class.serialize(writer)?;
        self.interfaces.serialize(writer)?;
        self.fields.serialize(writer)?;
        self.methods.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for ClassFile {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> std::io::Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != ClassFile::MAGIC {
            let msg = format!("Bad class file magic {:02X?}", magic);
            return Err(std::io::Error::new(ErrorKind::InvalidData, msg));
        }

        Ok(ClassFile {
            version: Version::deserialize(reader)?,
            constants: ConstantPool::deserialize(reader)?,
            access_flags: ClassAccessFlags::deserialize(reader)?,
            this_class: ClassConstantIndex::deserialize(reader)?,
            super_class: ClassConstantIndex::deserialize(reader)?,
            interfaces: Vec::<ClassConstantIndex>::deserialize(reader)?,
            fields: Vec::<Field>::deserialize(reader)?,
            methods: Vec::<Method>::deserialize(reader)?,
            attributes: Vec::<Attribute>::deserialize(reader)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn empty_class() -> ClassFile {
        let mut constants = ConstantPool::new();
        let this_class = constants.get_class("net/minecraft/Empty").unwrap();
        let super_class = constants.get_class("java/lang/Object").unwrap();
        ClassFile {
            version: Version::JAVA8,
            constants,
            access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
            this_class,
            super_class,
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            attributes: vec![],
        }
    }

    #[test]
    fn round_trip_empty_class() {
        let bytes = empty_class().to_bytes().unwrap();
        assert_eq!(&bytes[..8], &[0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 52]);

        let parsed = ClassFile::parse(&bytes).unwrap();
        assert_eq!(
            parsed.constants.class_name(parsed.this_class).unwrap(),
            "net/minecraft/Empty"
        );
        assert_eq!(parsed.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn bad_magic() {
        let mut bytes = empty_class().to_bytes().unwrap();
        bytes[0] = 0xCB;
        assert!(matches!(ClassFile::parse(&bytes), Err(Error::IoError(_))));
    }

    #[test]
    fn trailing_bytes() {
        let mut bytes = empty_class().to_bytes().unwrap();
        bytes.push(0);
        assert!(ClassFile::parse(&bytes).is_err());
    }

    #[test]
    fn truncated() {
        let bytes = empty_class().to_bytes().unwrap();
        assert!(ClassFile::parse(&bytes[..bytes.len() - 1]).is_err());
    }
}
