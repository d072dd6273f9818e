//! Visibility settings for articles created on the target.

use kbm_zendesk::{HelpCenter, PermissionGroup, UserSegment, ZendeskError};
use tracing::{info, warn};

/// Explicit visibility settings for created articles.
///
/// Unset fields are resolved from the target instance on first use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessOverrides {
    /// Permission group controlling who may edit.
    pub permission_group_id: Option<u64>,
    /// User segment controlling who may view.
    pub user_segment_id: Option<u64>,
}

/// Segment names that mean "visible to everyone signed in or not".
const OPEN_SEGMENT_NAMES: &[&str] = &["everyone", "all", "signed-in users"];

/// Resolve unset fields against the target.
///
/// The permission group falls back to the first group listed. The user
/// segment falls back to a segment with an open-audience name, or stays unset
/// (visible to everyone). Listing failures other than authentication leave
/// the field unset.
pub(crate) fn resolve(
    target: &dyn HelpCenter,
    overrides: AccessOverrides,
) -> Result<AccessOverrides, ZendeskError> {
    let mut access = overrides;

    if access.permission_group_id.is_none() {
        match target
            .list_permission_groups()
            .collect::<Result<Vec<PermissionGroup>, _>>()
        {
            Ok(groups) => access.permission_group_id = groups.first().map(|g| g.id),
            Err(err) if err.is_auth() => return Err(err),
            Err(err) => warn!(error = %err, "Cannot list permission groups"),
        }
    }

    if access.user_segment_id.is_none() {
        match target
            .list_user_segments()
            .collect::<Result<Vec<UserSegment>, _>>()
        {
            Ok(segments) => {
                access.user_segment_id = segments
                    .iter()
                    .find(|s| {
                        OPEN_SEGMENT_NAMES
                            .iter()
                            .any(|name| s.name.eq_ignore_ascii_case(name))
                    })
                    .map(|s| s.id);
            }
            Err(err) if err.is_auth() => return Err(err),
            Err(err) => warn!(error = %err, "Cannot list user segments"),
        }
    }

    info!(
        permission_group_id = ?access.permission_group_id,
        user_segment_id = ?access.user_segment_id,
        "Article visibility resolved"
    );
    Ok(access)
}
