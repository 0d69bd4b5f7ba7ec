mod migrate;

pub use migrate::MigrateArgs;
pub use migrate::MigrateOutcome;
pub use migrate::handle_migrate;
