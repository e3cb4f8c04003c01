pub mod memory_user_store;
pub mod mongo_user_store;
pub mod user_store;

pub use memory_user_store::InMemoryUserStore;
pub use mongo_user_store::MongoUserStore;
pub use user_store::UserStore;
