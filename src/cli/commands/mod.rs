pub mod export;
pub mod receipt;
pub mod summary;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(receipt::definitions())
        .chain(summary::definitions())
        .chain(export::definitions())
        .chain(system::maintenance_definitions())
    {
        registry.register(entry);
    }
}
