pub mod telegram_account;
pub mod user;

pub use telegram_account::{
    AuthStep,
    CreateTelegramAccountRequest,
    TelegramAccount,
    TelegramAccountView,
    TelegramAuthRequest,
    TelegramAuthResponse,
    TelegramChat,
    TelegramMessage,
};
pub use user::{AuthRequest, User};
