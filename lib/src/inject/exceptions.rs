use super::{join_names, split_list, Error};
use crate::jvm::model::Method;
use crate::jvm::{self, BinaryName, Name};

/// Apply a mapped exception list to a method
///
/// Without a mapping the declared exceptions are left alone (they are never generated). With
/// one, they are replaced outright, so an empty mapping clears them. Returns the exceptions the
/// method ends up declaring, comma-separated.
pub fn resolve_exceptions(method: &mut Method, mapped: Option<&str>) -> Result<String, Error> {
    if let Some(mapped) = mapped {
        log::debug!("Adding Exceptions: {}", mapped);
        method.exceptions = split_list(mapped)
            .map(|name| {
                BinaryName::from_string(name.to_owned()).map_err(jvm::Error::BadName)
            })
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(join_names(method.exceptions.iter().map(Name::as_str)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::{MethodAccessFlags, UnqualifiedName};

    fn method(exceptions: Vec<BinaryName>) -> Method {
        Method {
            access_flags: MethodAccessFlags::PUBLIC,
            name: UnqualifiedName::from_string(String::from("func_1_a")).unwrap(),
            descriptor: String::from("()V"),
            exceptions,
            code: None,
            attributes: vec![],
        }
    }

    fn io_exception() -> BinaryName {
        BinaryName::from_string(String::from("java/io/IOException")).unwrap()
    }

    #[test]
    fn absent_mapping_keeps_declared() {
        let mut method = method(vec![io_exception()]);
        assert_eq!(
            resolve_exceptions(&mut method, None).unwrap(),
            "java/io/IOException"
        );
        assert_eq!(method.exceptions, vec![io_exception()]);
    }

    #[test]
    fn mapping_replaces_declared() {
        let mut method = method(vec![io_exception()]);
        let resolved =
            resolve_exceptions(&mut method, Some("java/lang/Exception,java/io/IOException"))
                .unwrap();
        assert_eq!(resolved, "java/lang/Exception,java/io/IOException");
        assert_eq!(method.exceptions, vec![BinaryName::EXCEPTION, io_exception()]);
    }

    #[test]
    fn empty_mapping_clears() {
        let mut method = method(vec![io_exception()]);
        assert_eq!(resolve_exceptions(&mut method, Some("")).unwrap(), "");
        assert!(method.exceptions.is_empty());
    }

    #[test]
    fn bad_exception_name() {
        let mut method = method(vec![]);
        let err = resolve_exceptions(&mut method, Some("java.lang.Exception")).unwrap_err();
        assert!(matches!(err, Error::ClassFile(jvm::Error::BadName(_))));
    }
}
