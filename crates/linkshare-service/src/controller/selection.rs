//! Selection resolution after a fetch.

use linkshare_core::types::ShareId;
use linkshare_entity::LinkShare;

/// Pick the share to select after the list was replaced.
///
/// In order: the post-create override, the previous selection, then the
/// first share when `fallback_to_first` is set. Candidates that are no
/// longer listed are skipped.
pub fn resolve_selection(
    shares: &[LinkShare],
    override_id: Option<&ShareId>,
    previous: Option<&ShareId>,
    fallback_to_first: bool,
) -> Option<ShareId> {
    let listed = |id: &&ShareId| shares.iter().any(|share| share.id() == *id);

    override_id
        .filter(listed)
        .or_else(|| previous.filter(listed))
        .cloned()
        .or_else(|| {
            if fallback_to_first {
                shares.first().map(|share| share.id().clone())
            } else {
                None
            }
        })
}
