//! # lifeline-auth
//!
//! Session resolution for Blood Lifeline.
//!
//! [`SessionResolver`] reconciles the authentication provider's state
//! stream with per-user role records and a cached session hint, and
//! publishes one [`Session`] view. Providers plug in through
//! [`AuthProvider`]: [`MemoryAuthProvider`] for tests and
//! [`IdentityToolkitProvider`] for the hosted service, whose refresh token
//! is kept by [`credentials`].

pub mod credentials;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod session;

pub use error::{AuthAction, AuthError, CredentialError};
pub use provider::{
    AuthProvider, AuthState, AuthStateHub, AuthSubscription, IdentityToolkitProvider,
    MemoryAuthProvider, ProviderError, ProviderErrorCode,
};
pub use resolver::SessionResolver;
pub use session::{Access, Phase, Session};
