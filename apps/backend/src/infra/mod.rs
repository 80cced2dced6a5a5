//! Infrastructure: connections, migrations, state assembly, DB error mapping.

pub mod db;
pub mod db_errors;
pub mod state;
