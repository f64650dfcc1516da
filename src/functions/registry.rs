//! Allow-list of callable functions.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::builtin::{
    CancelReservation, CreateReservation, GetReservation, MoveReservation, UpdateReservation,
};
use super::function::{FunctionSignature, ReservationFunction};

/// Name -> function table. Built once at startup; dispatch only ever
/// resolves names that were explicitly registered here.
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Arc<dyn ReservationFunction>>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the builtin reservation functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_functions();
        registry
    }

    /// Register the five reservation functions.
    pub fn register_builtin_functions(&mut self) {
        self.register(Arc::new(CreateReservation));
        self.register(Arc::new(GetReservation));
        self.register(Arc::new(UpdateReservation));
        self.register(Arc::new(CancelReservation));
        self.register(Arc::new(MoveReservation));

        tracing::debug!(count = self.functions.len(), "Registered builtin functions");
    }

    /// Register a function under its own name, replacing any previous one.
    pub fn register(&mut self, function: Arc<dyn ReservationFunction>) {
        let name = function.name().to_string();
        if self.functions.insert(name.clone(), function).is_some() {
            tracing::warn!(function = %name, "Replaced previously registered function");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ReservationFunction>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Signatures for the requested names, or for everything when `names`
    /// is empty. Unknown names are skipped.
    pub fn signatures(&self, names: &[String]) -> Vec<FunctionSignature> {
        if names.is_empty() {
            return self.functions.values().map(|f| f.signature()).collect();
        }
        names
            .iter()
            .filter_map(|name| self.functions.get(name))
            .map(|f| f.signature())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec![
                "cancel_reservation",
                "create_reservation",
                "get_reservation",
                "move_reservation",
                "update_reservation",
            ]
        );
    }

    #[test]
    fn test_unregistered_names_do_not_resolve() {
        let registry = FunctionRegistry::with_builtins();
        for name in ["delete_everything", "swaig_dispatch", "reservations", "", "CREATE_RESERVATION"] {
            assert!(registry.get(name).is_none(), "{name} must not resolve");
        }
    }

    #[test]
    fn test_signatures_filter() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(registry.signatures(&[]).len(), 5);

        let picked = registry.signatures(&[
            "get_reservation".to_string(),
            "nope".to_string(),
        ]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].function, "get_reservation");
        assert_eq!(picked[0].purpose, "Retrieve an existing reservation");
    }

    #[test]
    fn test_empty_registry() {
        let registry = FunctionRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains("get_reservation"));
    }
}
