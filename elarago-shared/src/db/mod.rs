/// Database access layer
///
/// - `pool`: PostgreSQL connection pool construction and health checks
/// - `migrations`: versioned schema migrations, run once at process startup

pub mod migrations;
pub mod pool;
