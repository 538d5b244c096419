pub mod contact;
pub mod money;
