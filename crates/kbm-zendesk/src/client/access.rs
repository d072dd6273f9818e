//! Permission group and user segment lookups.

use super::ZendeskClient;
use crate::help_center::Listing;
use crate::types::{PermissionGroup, UserSegment};

impl ZendeskClient {
    pub(super) fn permission_groups(&self) -> Listing<'_, PermissionGroup> {
        self.paginate(
            format!("{}/permission_groups.json", self.guide_url()),
            "permission_groups",
        )
    }

    pub(super) fn user_segments(&self) -> Listing<'_, UserSegment> {
        self.paginate(
            format!("{}/user_segments.json", self.api_url()),
            "user_segments",
        )
    }
}
