pub mod layout;
pub mod now;
pub mod slots;
