//! Request classification for the cookie transport.
//!
//! Every request to a cookie-protected route lands in exactly one of three
//! states, and the split between the two failure states is part of the wire
//! contract: "no session" tells the client to authenticate, "unverified"
//! tells it the session is fine but the CSRF header is missing or stale.

use super::codec::SessionClaim;

/// Outcome of classifying one request, evaluated once, synchronously,
/// before the protected handler runs. Applies to every HTTP method reaching
/// a protected route, not only mutating ones.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RequestClass {
    /// No valid session artifact: cookie absent or failed to decode.
    NoSession,
    /// Valid session, but the CSRF header is missing or does not match the
    /// secret embedded in the claim.
    Unverified,
    /// Session valid and CSRF header matches; the request may proceed.
    Verified(SessionClaim),
}

/// Classify a request from its decoded session claim and CSRF header.
///
/// A missing cookie and a cookie that failed decoding are both `None` here;
/// neither can ever classify as `Unverified`.
pub(crate) fn classify(claim: Option<SessionClaim>, csrf_header: Option<&str>) -> RequestClass {
    match claim {
        None => RequestClass::NoSession,
        Some(claim) => match csrf_header {
            Some(header) if header == claim.csrf_secret => RequestClass::Verified(claim),
            _ => RequestClass::Unverified,
        },
    }
}
