//! Built-in generators shipped with the binary.

mod inventory;

pub use inventory::{
    export_inventory, write_inventory_page, InventoryExtractor, INVENTORY_TABLE,
};

use crate::generator::{handler_fn, ExtractionGuard, GeneratorRegistry, Guarded, HandlerExt};
use std::sync::Arc;

/// Register the built-in generators.
///
/// `inventory` and `inventory-export` share one extraction guard, so a book
/// listing both is scanned once.
pub fn register_builtin(registry: &mut GeneratorRegistry) {
    let guard = Arc::new(ExtractionGuard::new());
    let scan = Guarded::new(Arc::new(InventoryExtractor::default()), guard);

    registry
        .register_chain(
            "inventory",
            vec![scan.clone().boxed(), handler_fn(write_inventory_page).boxed()],
        )
        .register_chain(
            "inventory-export",
            vec![scan.boxed(), handler_fn(export_inventory).boxed()],
        );
}

/// Registry holding only the built-in generators
pub fn builtin_registry() -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();
    register_builtin(&mut registry);
    registry
}
