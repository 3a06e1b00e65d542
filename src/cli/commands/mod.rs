mod admin;
mod forge;
mod initdb;
mod serve;

pub use admin::cmd_admin;
pub use forge::cmd_forge;
pub use initdb::cmd_initdb;
pub use serve::cmd_serve;
