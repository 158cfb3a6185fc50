use crate::basic_types::ModelError;
use crate::containers::HashMap;
use crate::engine::variables::VariableId;

#[derive(Debug, Default, Clone)]
pub struct VariableNames {
    names: HashMap<VariableId, String>,
    by_name: HashMap<String, VariableId>,
}

impl VariableNames {
    /// Get the name associated with a variable.
    pub(crate) fn get_name(&self, variable: VariableId) -> Option<&str> {
        self.names.get(&variable).map(|name| name.as_str())
    }

    /// Get the variable associated with the given name.
    pub(crate) fn get_by_name(&self, name: &str) -> Option<VariableId> {
        self.by_name.get(name).copied()
    }

    /// Whether `name` is already given to a variable.
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Name a variable. Names are unique within a state.
    pub(crate) fn add(&mut self, variable: VariableId, name: &str) -> Result<(), ModelError> {
        if self.contains(name) {
            return Err(ModelError::DuplicateName(name.to_owned()));
        }

        let _ = self.names.insert(variable, name.to_owned());
        let _ = self.by_name.insert(name.to_owned(), variable);
        Ok(())
    }
}
