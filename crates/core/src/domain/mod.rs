pub mod intent;
pub mod inventory;
