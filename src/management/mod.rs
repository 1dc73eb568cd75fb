mod store;
mod token;

pub use store::TokenStore;
pub use token::TokenManager;
