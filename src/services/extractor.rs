//! Entity extraction heuristics over UI snapshots.
//!
//! Two jobs: enumerate the clickable rows of the target-list screen, and
//! harvest member tokens from an opened list with a bounded scroll-scan
//! loop. Both work purely on text and structure; no semantic understanding
//! of the host UI is attempted.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Member, NodeId, ScanConfig, TargetHandle, UiNode, UiSnapshot};

use super::navigator::Navigator;
use super::resolver::IdentityResolver;

/// Structural class-name fragments that mark a scrollable container.
const CONTAINER_CLASSES: [&str; 3] = ["RecyclerView", "ListView", "ScrollView"];

fn is_scroll_container(node: &UiNode) -> bool {
    node.scrollable
        || node
            .class_name
            .as_deref()
            .is_some_and(|class| CONTAINER_CLASSES.iter().any(|c| class.contains(c)))
}

/// Rejection filter for raw tokens: too short, or UI chrome.
pub fn reject_token(token: &str, scan: &ScanConfig) -> bool {
    let trimmed = token.trim();
    if trimmed.chars().count() < scan.min_token_len {
        return true;
    }
    let lower = trimmed.to_lowercase();
    scan.stoplist
        .iter()
        .any(|phrase| lower.contains(&phrase.to_lowercase()))
}

/// Enumerates candidate targets on the target-list screen.
///
/// Primary heuristic: the clickable direct children of the first
/// scrollable container. Fallback: a node mentioning the recipient-count
/// marker, promoted to its nearest clickable ancestor.
pub fn enumerate_targets(
    snap: &UiSnapshot,
    recipient_marker: &str,
    scan: &ScanConfig,
) -> Vec<TargetHandle> {
    let container = snap
        .dfs()
        .into_iter()
        .find(|&id| snap.node(id).is_some_and(is_scroll_container));

    if let Some(container) = container {
        let targets: Vec<TargetHandle> = snap
            .children(container)
            .into_iter()
            .filter(|&child| snap.node(child).is_some_and(|n| n.clickable))
            .map(|child| target_from(snap, child, scan))
            .collect();
        if !targets.is_empty() {
            return targets;
        }
    }

    if let Some(marker) = snap.find_by_text(recipient_marker) {
        if let Some(row) = snap.clickable_ancestor(marker) {
            return vec![target_from(snap, row, scan)];
        }
    }

    Vec::new()
}

fn target_from(snap: &UiSnapshot, id: NodeId, scan: &ScanConfig) -> TargetHandle {
    let label = snap
        .subtree_texts(id)
        .into_iter()
        .find(|text| !reject_token(text, scan))
        .map(|text| text.trim().to_string());
    TargetHandle {
        node: id,
        label,
        bounds: snap.node(id).map(|n| n.bounds).unwrap_or_default(),
    }
}

/// Scroll-scan loop inside an opened target.
///
/// Each iteration scans the visible tree, then scrolls. The loop ends when
/// the scroll gesture fails to dispatch or after `max_scroll_passes`
/// iterations, whichever comes first; the cap bounds worst-case scan time
/// but can truncate very long lists. The post-scroll settle cannot tell a
/// finished list from a transiently failed gesture.
pub async fn scan_members(
    nav: &Navigator,
    resolver: &IdentityResolver,
    scan: &ScanConfig,
) -> DomainResult<Vec<Member>> {
    let mut members: Vec<Member> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for pass in 0..scan.max_scroll_passes {
        nav.check_cancelled()?;
        let snap = nav.current().await?;
        collect_visible(&snap, resolver, scan, &mut members, &mut seen);
        debug!(pass, total = members.len(), "member scan pass");

        if !nav.scroll_down().await? {
            break;
        }
        nav.settle().await?;
    }

    Ok(members)
}

fn collect_visible(
    snap: &UiSnapshot,
    resolver: &IdentityResolver,
    scan: &ScanConfig,
    members: &mut Vec<Member>,
    seen: &mut HashSet<String>,
) {
    for id in snap.dfs() {
        let Some(node) = snap.node(id) else { continue };
        for token in [node.text.as_deref(), node.description.as_deref()]
            .into_iter()
            .flatten()
        {
            if reject_token(token, scan) {
                continue;
            }
            if let Some(member) = resolver.resolve(token) {
                if seen.insert(member.name.to_lowercase()) {
                    members.push(member);
                }
            }
        }
    }
}
