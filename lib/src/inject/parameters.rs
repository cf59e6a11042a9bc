use super::{join_names, split_list, Error, Injector};
use crate::jvm::class_file::BytecodeIndex;
use crate::jvm::model::{LocalVariable, Method};
use crate::jvm::{
    BinaryName, FieldType, MethodDescriptor, Name, RenderDescriptor, UnqualifiedName,
};

/// Identifier embedded in a method name of the form `func_<digits>_<anything>`
fn func_id(name: &str) -> Option<&str> {
    let rest = name.strip_prefix("func_")?;
    let (id, suffix) = rest.split_at(rest.find('_')?);
    let all_digits = !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit());
    if all_digits && suffix.len() > 1 {
        Some(id)
    } else {
        None
    }
}

impl Injector {
    /// Name the parameters of a method and rebuild its local variable table to match
    ///
    /// With a mapping (even an empty one), the names come from the mapping. Without one, names
    /// are only generated when auto-generation is on, otherwise the existing table is kept.
    /// Returns the names in the method's debug information other than `this`, comma-separated
    /// (or nothing at all for classes outside the managed namespace).
    pub fn resolve_parameters(
        &mut self,
        class: &BinaryName,
        method: &mut Method,
        mapped: Option<&str>,
    ) -> Result<String, Error> {
        let descriptor = MethodDescriptor::from_descriptor(&method.descriptor)?;

        let mut names: Vec<String> = vec![];
        let mut types: Vec<String> = vec![];
        if !method.is_static() {
            names.push(UnqualifiedName::THIS.as_str().to_owned());
            types.push(FieldType::object(class.clone()).render());
        }
        let offset = types.len();
        types.extend(descriptor.parameters.iter().map(RenderDescriptor::render));

        let rebuild = match mapped {
            Some(mapped) => {
                names.extend(split_list(mapped).map(str::to_owned));
                true
            }
            None if self.auto_generate() => {
                names.extend(self.generate_names(class, &method.name, offset, types.len()));
                true
            }
            None => false,
        };

        let locals = if rebuild {
            if names.len() != types.len() {
                return Err(Error::ArgumentCountMismatch {
                    expected: types.len(),
                    found: names.len(),
                });
            }
            Some(Self::local_variables(method, names, types))
        } else {
            None
        };

        let reported = match (method.code.as_mut(), locals) {
            (Some(code), Some(locals)) => {
                code.replace_local_variables(locals);
                reported_names(&code.local_variables)
            }
            (Some(code), None) => reported_names(&code.local_variables),
            (None, Some(locals)) => reported_names(&locals),
            (None, None) => String::new(),
        };

        if class.is_within(&self.settings.managed_namespace) {
            Ok(reported)
        } else {
            Ok(String::new())
        }
    }

    /// Placeholder names for the parameter slots `offset..len`
    fn generate_names(
        &mut self,
        class: &BinaryName,
        method: &UnqualifiedName,
        offset: usize,
        len: usize,
    ) -> Vec<String> {
        if let Some(id) = func_id(method.as_str()) {
            (offset..len).map(|slot| format!("p_{}_{}_", id, slot)).collect()
        } else if *method == UnqualifiedName::INIT
            && class.is_within(&self.settings.managed_namespace)
        {
            if len <= offset {
                return vec![];
            }
            let index = self.index;
            self.index = self.index.saturating_add(1);
            (offset..len)
                .map(|slot| format!("p_i{}_{}_", index, slot))
                .collect()
        } else {
            (offset..len).map(|slot| format!("par{}", slot)).collect()
        }
    }

    /// Entries spanning the whole method body, one per argument slot
    fn local_variables(
        method: &Method,
        names: Vec<String>,
        types: Vec<String>,
    ) -> Vec<LocalVariable> {
        let (start, end) = match &method.code {
            Some(code) => (code.start_label(), code.end_label()),
            None => (BytecodeIndex(0), BytecodeIndex(0)),
        };
        names
            .into_iter()
            .zip(types)
            .enumerate()
            .map(|(slot, (name, descriptor))| {
                log::debug!("Naming argument {} -> {} {}", slot, name, descriptor);
                LocalVariable {
                    name,
                    descriptor,
                    start,
                    end,
                    index: slot as u16,
                }
            })
            .collect()
    }
}

fn reported_names(locals: &[LocalVariable]) -> String {
    join_names(
        locals
            .iter()
            .map(|local| local.name.as_str())
            .filter(|name| *name != UnqualifiedName::THIS.as_str()),
    )
}
