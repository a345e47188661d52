pub mod identity;
pub mod jwt;
pub mod lookup;
pub mod password;

pub use identity::{current_identity, Identity, Principal};
pub use jwt::{Claims, TokenError, TokenService};
pub use lookup::{DbIdentityLookup, IdentityLookup, UnavailableIdentityLookup};
