//! Rewrite the exceptions and parameter names of every method in a class
//!
//! One [`Injector`] drives a whole job: it owns the input mappings, the output mappings built up
//! as classes go by, and the constructor counter used for generated names. The counter runs
//! across all classes of the job (not per class), which is what keeps generated constructor
//! parameter names unique.

mod errors;
mod exceptions;
mod parameters;

pub use errors::*;
pub use exceptions::*;

use crate::archive;
use crate::jvm::model::Class;
use crate::mappings::{MappingEntry, MappingTable, SignatureKey};
use std::path::Path;

pub struct Settings {
    /// Class name prefix of the code base being named (eg. `net/minecraft/`)
    ///
    /// Only classes under this prefix report parameter names into the output mappings, and only
    /// their constructors use the constructor counter.
    pub managed_namespace: String,

    /// First value of the constructor counter
    ///
    /// Zero turns off name generation entirely: methods without a mapping are left alone.
    pub initial_index: u32,
}

impl Settings {
    pub const DEFAULT_NAMESPACE: &'static str = "net/minecraft/";

    pub fn new(initial_index: u32) -> Settings {
        Settings {
            managed_namespace: String::from(Self::DEFAULT_NAMESPACE),
            initial_index,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new(0)
    }
}

pub struct Injector {
    settings: Settings,
    mappings: MappingTable,
    out_mappings: MappingTable,

    /// Constructor counter (next value to hand out)
    index: u32,
}

impl Injector {
    pub fn new(settings: Settings, mappings: MappingTable) -> Injector {
        let index = settings.initial_index;
        Injector {
            settings,
            mappings,
            out_mappings: MappingTable::new(),
            index,
        }
    }

    /// Exceptions and parameter names of every method that ended up with some
    pub fn out_mappings(&self) -> &MappingTable {
        &self.out_mappings
    }

    pub fn current_index(&self) -> u32 {
        self.index
    }

    /// Are names generated for methods without a mapping?
    pub fn auto_generate(&self) -> bool {
        self.settings.initial_index > 0
    }

    /// Header for the output mappings, present only when generation was on
    pub fn out_mappings_header(&self) -> Option<String> {
        if self.auto_generate() {
            Some(MappingTable::max_index_header(self.index))
        } else {
            None
        }
    }

    pub fn save_mappings(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let header = self.out_mappings_header();
        self.out_mappings.save(path, header.as_deref())
    }

    /// Rewrite every class of an archive into a new archive
    pub fn process_jar(
        &mut self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<(), Error> {
        archive::transform_paths(input, output, |bytes| self.process_class(bytes))
    }

    /// Rewrite the methods of one class
    pub fn process_class(&mut self, bytes: &[u8]) -> Result<Vec<u8>, Error> {
        let mut class = Class::parse(bytes)?;
        log::debug!(
            "Class: {} Extends: {}",
            class.name,
            class
                .super_name
                .as_ref()
                .map_or("<none>", |name| name.as_ref())
        );

        for method in &mut class.methods {
            log::trace!("Name: {} Desc: {}", method.name, method.descriptor);

            let key = SignatureKey::new(
                class.name.clone(),
                method.name.clone(),
                method.descriptor.as_str(),
            )
            .to_string();
            let entry = self.mappings.get(&key).cloned();
            let mapped_exceptions = entry.as_ref().map(|entry| entry.exceptions.as_str());
            let mapped_parameters = entry.as_ref().and_then(|entry| entry.parameters.as_deref());

            let exceptions = resolve_exceptions(method, mapped_exceptions)
                .map_err(|err| err.in_method(&key))?;
            let parameters = self
                .resolve_parameters(&class.name, method, mapped_parameters)
                .map_err(|err| err.in_method(&key))?;

            if !exceptions.is_empty() || !parameters.is_empty() {
                let entry = MappingEntry::new(exceptions, Some(parameters));
                self.out_mappings.insert(key, entry);
            }
        }

        Ok(class.serialize()?)
    }
}

/// Items of a comma-separated list (an empty string being an empty list)
fn split_list(list: &str) -> impl Iterator<Item = &str> {
    (!list.is_empty())
        .then(|| list.split(','))
        .into_iter()
        .flatten()
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<&str>>().join(",")
}
