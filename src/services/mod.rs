pub mod store;
pub mod mongo_store;
pub mod db_init;
