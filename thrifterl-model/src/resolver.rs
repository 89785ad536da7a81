//! Typedef resolution.

use crate::error::ModelError;
use crate::model::Model;
use crate::types::{Type, TypeId};
use std::collections::HashSet;

impl Model {
    /// Follows typedef links until a non-alias type is reached.
    ///
    /// Returns `id` unchanged when it already names a non-alias type.
    ///
    /// # Errors
    /// Returns `ModelError::CyclicAlias` if the chain revisits a type and
    /// `ModelError::UnknownTypeId` if it leaves the arena.
    pub fn resolve(&self, id: TypeId) -> Result<TypeId, ModelError> {
        let mut current = id;
        let mut seen = HashSet::new();
        let mut path = Vec::new();

        loop {
            let ty = self.get_type(current)?;
            let Type::Alias { name, target } = ty else {
                return Ok(current);
            };
            path.push(name.as_str());
            if !seen.insert(current) {
                return Err(ModelError::CyclicAlias {
                    path: path.join(" -> "),
                });
            }
            current = *target;
        }
    }

    /// Resolves `id` and returns the concrete type.
    ///
    /// # Errors
    /// See [`Model::resolve`].
    pub fn true_type(&self, id: TypeId) -> Result<&Type, ModelError> {
        let resolved = self.resolve(id)?;
        self.get_type(resolved)
    }
}
