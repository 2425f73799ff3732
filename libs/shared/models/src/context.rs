use serde::{Deserialize, Serialize};

/// Who a request is being made for. Passed explicitly into wizard and
/// blood-request construction instead of being read from ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: Option<String>,
    /// Family member the request is made on behalf of, if not the user.
    pub family_member: Option<String>,
}

impl RequestContext {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            family_member: None,
        }
    }

    pub fn on_behalf_of(mut self, family_member: impl Into<String>) -> Self {
        self.family_member = Some(family_member.into());
        self
    }
}
