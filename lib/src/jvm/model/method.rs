use crate::jvm::class_file::{self, Attribute, AttributeLike, ConstantPool, Exceptions};
use crate::jvm::model::code::decode_attribute;
use crate::jvm::model::Code;
use crate::jvm::{BinaryName, Error, MethodAccessFlags, Name, UnqualifiedName};

/// Editable representation of a method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub access_flags: MethodAccessFlags,
    pub name: UnqualifiedName,

    /// Method descriptor, as it appears in the class file (eg. `(ILjava/lang/String;)V`)
    pub descriptor: String,

    /// Which exceptions does this method declare it throws?
    ///
    /// An empty list means the method has no `Exceptions` attribute.
    pub exceptions: Vec<BinaryName>,

    /// Method body (absent for `abstract` and `native` methods)
    pub code: Option<Code>,

    /// Every other method attribute, untouched
    pub attributes: Vec<Attribute>,
}

impl Method {
    pub fn is_static(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::STATIC)
    }

    pub(crate) fn parse(
        method: class_file::Method,
        constants: &ConstantPool,
    ) -> Result<Method, Error> {
        let name = constants.utf8(method.name_index)?;
        let name = UnqualifiedName::from_string(name.into_owned()).map_err(Error::BadName)?;
        let descriptor = constants.utf8(method.descriptor_index)?.into_owned();

        let mut code = None;
        let mut exceptions = vec![];
        let mut attributes = vec![];

        for attribute in method.attributes {
            let attribute_name = constants.utf8(attribute.name_index)?;
            if attribute_name == class_file::Code::NAME && code.is_none() {
                let decoded: class_file::Code = decode_attribute(&attribute)?;
                code = Some(Code::parse(decoded, constants)?);
            } else if attribute_name == Exceptions::NAME {
                let decoded: Exceptions = decode_attribute(&attribute)?;
                for exception in decoded.0 {
                    let exception = constants.class_name(exception)?;
                    let exception = BinaryName::from_string(exception.into_owned())
                        .map_err(Error::BadName)?;
                    exceptions.push(exception);
                }
            } else {
                attributes.push(attribute);
            }
        }

        Ok(Method {
            access_flags: method.access_flags,
            name,
            descriptor,
            exceptions,
            code,
            attributes,
        })
    }

    /// Serialize the method
    ///
    /// Attributes are written as `Code`, then `Exceptions`, then everything else.
    pub(crate) fn serialize(
        self,
        constants: &mut ConstantPool,
    ) -> Result<class_file::Method, Error> {
        let name_index = constants.get_utf8(self.name.as_str())?;
        let descriptor_index = constants.get_utf8(self.descriptor)?;

        let mut attributes = vec![];

        // `Code` attribute
        if let Some(code) = self.code {
            let code = code.serialize(constants)?;
            attributes.push(constants.get_attribute(code)?);
        }

        // `Exceptions` attribute
        if !self.exceptions.is_empty() {
            let exceptions = self
                .exceptions
                .iter()
                .map(|exception| constants.get_class(exception.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            attributes.push(constants.get_attribute(Exceptions(exceptions))?);
        }

        attributes.extend(self.attributes);

        Ok(class_file::Method {
            access_flags: self.access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }
}
