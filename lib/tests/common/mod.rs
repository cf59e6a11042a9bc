#![allow(dead_code)]

use mcinjector::jvm::class_file::{
    BytecodeArray, ClassFile, Code, ConstantPool, Exceptions, Method, Version,
};
use mcinjector::jvm::model::Class;
use mcinjector::jvm::{ClassAccessFlags, MethodAccessFlags};
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// Method to put in a test class
pub struct MethodDef {
    pub access_flags: MethodAccessFlags,
    pub name: &'static str,
    pub descriptor: &'static str,
    pub exceptions: Vec<&'static str>,
}

impl MethodDef {
    pub fn new(name: &'static str, descriptor: &'static str) -> MethodDef {
        MethodDef {
            access_flags: MethodAccessFlags::PUBLIC,
            name,
            descriptor,
            exceptions: vec![],
        }
    }

    pub fn with_flags(mut self, access_flags: MethodAccessFlags) -> MethodDef {
        self.access_flags = access_flags;
        self
    }

    pub fn throwing(mut self, exception: &'static str) -> MethodDef {
        self.exceptions.push(exception);
        self
    }
}

/// Encode a class whose concrete methods all have a body of just `return`
pub fn class_bytes(name: &str, methods: Vec<MethodDef>) -> Vec<u8> {
    class_bytes_with_strings(name, methods, &[])
}

/// Same as [`class_bytes`], with extra unreferenced `Utf8` constants at the end of the pool
pub fn class_bytes_with_strings(name: &str, methods: Vec<MethodDef>, strings: &[&str]) -> Vec<u8> {
    let mut constants = ConstantPool::new();
    let this_class = constants.get_class(name).unwrap();
    let super_class = constants.get_class("java/lang/Object").unwrap();

    let methods = methods
        .into_iter()
        .map(|def| {
            let mut attributes = vec![];
            let is_abstract = def
                .access_flags
                .intersects(MethodAccessFlags::ABSTRACT | MethodAccessFlags::NATIVE);
            if !is_abstract {
                let code = Code {
                    max_stack: 0,
                    max_locals: 0,
                    code_array: BytecodeArray(vec![0xb1]),
                    exception_table: vec![],
                    attributes: vec![],
                };
                attributes.push(constants.get_attribute(code).unwrap());
            }
            if !def.exceptions.is_empty() {
                let exceptions = def
                    .exceptions
                    .iter()
                    .map(|exception| constants.get_class(*exception).unwrap())
                    .collect();
                attributes.push(constants.get_attribute(Exceptions(exceptions)).unwrap());
            }
            Method {
                access_flags: def.access_flags,
                name_index: constants.get_utf8(def.name).unwrap(),
                descriptor_index: constants.get_utf8(def.descriptor).unwrap(),
                attributes,
            }
        })
        .collect();

    for string in strings {
        constants.get_utf8(*string).unwrap();
    }

    ClassFile {
        version: Version::JAVA8,
        constants,
        access_flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
        this_class,
        super_class,
        interfaces: vec![],
        fields: vec![],
        methods,
        attributes: vec![],
    }
    .to_bytes()
    .unwrap()
}

/// Names (other than `this`) and slots in the local variable table of a method
pub fn local_variables(class: &Class, method: &str) -> Vec<(String, u16)> {
    let method = class
        .methods
        .iter()
        .find(|m| m.name.as_ref() == method)
        .unwrap();
    method
        .code
        .as_ref()
        .unwrap()
        .local_variables
        .iter()
        .map(|local| (local.name.clone(), local.index))
        .collect()
}

/// Archive entry: `None` contents mean a directory
pub type Entry = (String, Option<Vec<u8>>);

pub fn jar(entries: &[Entry]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        match contents {
            None => writer.add_directory(name.as_str(), FileOptions::default()).unwrap(),
            Some(contents) => {
                writer.start_file(name.as_str(), FileOptions::default()).unwrap();
                writer.write_all(contents).unwrap();
            }
        }
    }
    writer.finish().unwrap().into_inner()
}

pub fn read_jar(bytes: &[u8]) -> Vec<Entry> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entries = vec![];
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).unwrap();
        let name = entry.name().to_owned();
        if entry.is_dir() {
            entries.push((name, None));
        } else {
            let mut contents = vec![];
            entry.read_to_end(&mut contents).unwrap();
            entries.push((name, Some(contents)));
        }
    }
    entries
}
