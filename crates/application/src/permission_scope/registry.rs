use std::sync::Arc;

use super::*;

/// Immutable lookup table from storage scope to its handler.
#[derive(Clone)]
pub struct PermissionScopeRegistry {
    handlers: HashMap<PermissionScope, Arc<dyn PermissionScopeHandler>>,
}

impl PermissionScopeRegistry {
    /// Builds the registry, rejecting two handlers for one scope.
    pub fn new(
        handlers: impl IntoIterator<Item = Arc<dyn PermissionScopeHandler>>,
    ) -> AppResult<Self> {
        let mut registered: HashMap<PermissionScope, Arc<dyn PermissionScopeHandler>> =
            HashMap::new();

        for handler in handlers {
            let scope = handler.scope();
            if registered.insert(scope, handler).is_some() {
                return Err(AppError::Configuration(format!(
                    "more than one permission scope handler registered for scope '{scope}'"
                )));
            }
        }

        Ok(Self {
            handlers: registered,
        })
    }

    /// Returns the handler for a scope.
    pub fn handler(&self, scope: PermissionScope) -> AppResult<&Arc<dyn PermissionScopeHandler>> {
        self.handlers.get(&scope).ok_or_else(|| {
            AppError::Configuration(format!(
                "no permission scope handler registered for scope '{scope}'"
            ))
        })
    }

    /// Returns registered scopes in declaration order.
    #[must_use]
    pub fn scopes(&self) -> Vec<PermissionScope> {
        PermissionScope::all()
            .iter()
            .copied()
            .filter(|scope| self.handlers.contains_key(scope))
            .collect()
    }
}
