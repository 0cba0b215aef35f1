pub mod books;

use bookshelf_kernel::ModuleRegistry;
use sqlx::PgPool;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, pool: &PgPool) {
    registry.register(books::create_module(pool.clone()));
}
