pub mod black_websites;
pub mod blacklist;
pub mod cards;
pub mod countries;
pub mod notifications;
pub mod orders;
pub mod support_conversations;
pub mod support_stats;
pub mod transactions;
pub mod users;

pub use black_websites as black_website_entity;
pub use blacklist as blacklist_entity;
pub use cards as card_entity;
pub use countries as country_entity;
pub use notifications as notification_entity;
pub use orders as order_entity;
pub use support_conversations as support_conversation_entity;
pub use support_stats as support_stats_entity;
pub use transactions as transaction_entity;
pub use users as user_entity;
