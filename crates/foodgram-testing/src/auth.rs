//! Gateway identity helpers for tests.
//!
//! Services receive `x-foodgram-user-id` + `x-foodgram-user-role` from the
//! gateway. `MockAuth` builds those headers directly so no gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use foodgram_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use foodgram_domain::id::UserId;
use foodgram_domain::user::UserRole;

/// Identity injected into test requests.
#[derive(Debug, Clone, Copy)]
pub struct MockAuth {
    pub user_id: UserId,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// A fresh normal user.
    pub fn user() -> Self {
        Self::new(UserId(Uuid::now_v7()), UserRole::Normal)
    }

    /// A fresh administrator.
    pub fn admin() -> Self {
        Self::new(UserId(Uuid::now_v7()), UserRole::Admin)
    }

    /// Headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_str(&self.role.as_u8().to_string()).unwrap(),
        );
        map
    }
}
