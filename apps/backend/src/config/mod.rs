pub mod app;
pub mod db;

pub use app::{AppConfig, CloudinaryConfig, RuntimeEnv};
pub use db::DbProfile;
