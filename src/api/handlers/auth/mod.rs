//! Authentication handlers and supporting modules.
//!
//! Two stateless credential transports authenticate against the same user
//! store: an encrypted-then-MACed session cookie paired with a per-login
//! CSRF secret, and a self-contained HS256 bearer token. Exactly one
//! transport is evaluated per protected route.
//!
//! ## Keys
//!
//! The session encryption key, session MAC key, and token signing key are
//! injected at startup and never rotated at runtime. Rotating the session
//! keys invalidates all outstanding cookies; rotating the token key
//! invalidates all outstanding bearer tokens. There is no revocation
//! mechanism: expiry and key rotation are the only ways to retire a
//! credential.

use hmac::Hmac;
use sha2::Sha256;

pub(crate) type HmacSha256 = Hmac<Sha256>;

pub(crate) mod codec;
pub(crate) mod gate;
mod guard;
pub(crate) mod session;
mod state;
pub(crate) mod storage;
pub(crate) mod token;
pub(crate) mod token_login;
pub(crate) mod types;
mod utils;
mod verifier;

pub use codec::{SessionClaim, SessionCodec};
pub use state::{AuthConfig, AuthState, SameSite};
pub use token::TokenAuthority;
