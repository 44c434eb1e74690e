pub mod client;
pub mod grammers;
pub mod registry;
pub mod telegram;
