//! Gateway-injected identity headers extractor.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use foodgram_domain::id::UserId;
use foodgram_domain::user::UserRole;

pub const USER_ID_HEADER: &str = "x-foodgram-user-id";
pub const USER_ROLE_HEADER: &str = "x-foodgram-user-role";

/// User identity injected by the gateway via `x-foodgram-user-id` and
/// `x-foodgram-user-role` headers.
///
/// As a required extractor it returns 401 when either header is absent or
/// malformed. As `Option<IdentityHeaders>` it yields `None` for anonymous
/// requests (no user-id header) and still rejects malformed headers.
#[derive(Debug, Clone, Copy)]
pub struct IdentityHeaders {
    pub user_id: UserId,
    pub user_role: u8,
}

impl IdentityHeaders {
    /// Unknown role values are treated as the least privileged role.
    pub fn role(&self) -> UserRole {
        UserRole::from_u8(self.user_role).unwrap_or(UserRole::Normal)
    }
}

enum Parsed {
    Anonymous,
    Invalid,
    Identity(IdentityHeaders),
}

fn parse(parts: &Parts) -> Parsed {
    let Some(raw_user_id) = parts.headers.get(USER_ID_HEADER) else {
        return Parsed::Anonymous;
    };
    let user_id = raw_user_id
        .to_str()
        .ok()
        .and_then(|s| s.parse::<Uuid>().ok());
    let user_role = parts
        .headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u8>().ok());

    match (user_id, user_role) {
        (Some(user_id), Some(user_role)) => Parsed::Identity(IdentityHeaders {
            user_id: UserId(user_id),
            user_role,
        }),
        _ => {
            tracing::debug!("rejecting malformed identity headers");
            Parsed::Invalid
        }
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Parse synchronously and return a 'static future so the borrow of `parts`
    // does not leak into the returned future.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let parsed = parse(parts);
        async move {
            match parsed {
                Parsed::Identity(identity) => Ok(identity),
                Parsed::Anonymous | Parsed::Invalid => Err(StatusCode::UNAUTHORIZED),
            }
        }
    }
}

impl<S> OptionalFromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let parsed = parse(parts);
        async move {
            match parsed {
                Parsed::Identity(identity) => Ok(Some(identity)),
                Parsed::Anonymous => Ok(None),
                Parsed::Invalid => Err(StatusCode::UNAUTHORIZED),
            }
        }
    }
}
