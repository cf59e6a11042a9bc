use crate::jvm::{BinaryName, Name, UnqualifiedName};
use std::fmt;

/// Identifies one method across the whole job
///
/// The textual form, used as the key in mapping files, is `owner.namedescriptor` with nothing
/// between the method name and its descriptor (eg. `net/minecraft/Foo.func_123_a(I)V`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SignatureKey {
    pub owner: BinaryName,
    pub name: UnqualifiedName,
    pub descriptor: String,
}

impl SignatureKey {
    pub fn new(owner: BinaryName, name: UnqualifiedName, descriptor: impl Into<String>) -> Self {
        SignatureKey {
            owner,
            name,
            descriptor: descriptor.into(),
        }
    }
}

impl fmt::Display for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{}",
            self.owner.as_str(),
            self.name.as_str(),
            self.descriptor
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn textual_form() {
        let key = SignatureKey::new(
            BinaryName::from_string(String::from("net/minecraft/Foo")).unwrap(),
            UnqualifiedName::from_string(String::from("func_123_a")).unwrap(),
            "(I)V",
        );
        assert_eq!(key.to_string(), "net/minecraft/Foo.func_123_a(I)V");

        let init = SignatureKey::new(BinaryName::OBJECT, UnqualifiedName::INIT, "()V");
        assert_eq!(init.to_string(), "java/lang/Object.<init>()V");
    }
}
