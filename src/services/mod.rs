pub mod card_service;
pub mod order_service;
pub mod schema_initializer;
pub mod seed_service;
pub mod transaction_service;
pub mod user_service;

pub use card_service::*;
pub use order_service::*;
pub use schema_initializer::*;
pub use seed_service::*;
pub use transaction_service::*;
pub use user_service::*;
