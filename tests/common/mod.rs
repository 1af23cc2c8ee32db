//! Shared fixtures for integration tests: a scripted host application,
//! recording test doubles, and a tight-timing config.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use changeling::domain::errors::DomainResult;
use changeling::domain::models::{
    Bounds, Config, DirectoryEntry, MemberList, NodeId, ProgressUpdate, UiNode, UiSnapshot,
};
use changeling::domain::ports::{
    DirectoryProvider, RunObserver, SyncClient, SyncPayload, UiDriver,
};
use changeling::infrastructure::{ScriptScreen, TapRule, UiScript};

pub const HOST_APP: &str = "org.example.messenger";

/// Config tuned for paused-time tests: short waits, scripted host anchors.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.device.identifier = "test-device".to_string();
    config.host.app_candidates = vec![HOST_APP.to_string()];
    config.timing.poll_interval_ms = 10;
    config.timing.wait_timeout_ms = 500;
    config.timing.scroll_settle_ms = 20;
    config
}

pub fn text(value: &str) -> UiNode {
    UiNode {
        text: Some(value.to_string()),
        ..UiNode::default()
    }
}

pub fn button(description: &str) -> UiNode {
    UiNode {
        description: Some(description.to_string()),
        clickable: true,
        bounds: Bounds::new(1000, 80, 1080, 160),
        ..UiNode::default()
    }
}

fn clickable_text(value: &str) -> UiNode {
    UiNode {
        text: Some(value.to_string()),
        clickable: true,
        ..UiNode::default()
    }
}

fn row(children: Vec<usize>, top: i32) -> UiNode {
    UiNode {
        clickable: true,
        bounds: Bounds::new(0, top, 1080, top + 120),
        children,
        ..UiNode::default()
    }
}

/// The target-list screen: header marker plus a scrollable container with
/// one clickable row per list, each row carrying a name and a recipient
/// count.
fn broadcasts_page(rows: &[(&str, &str)]) -> UiSnapshot {
    let mut nodes = vec![
        UiNode {
            children: vec![1, 2],
            ..UiNode::default()
        },
        text("Broadcast lists"),
        UiNode {
            class_name: Some("androidx.recyclerview.widget.RecyclerView".to_string()),
            scrollable: true,
            children: Vec::new(),
            ..UiNode::default()
        },
    ];

    for (i, (name, count)) in rows.iter().enumerate() {
        let name_index = nodes.len() + 1;
        let base = i32::try_from(i).unwrap() * 130;
        nodes.push(row(vec![name_index, name_index + 1], 200 + base));
        nodes.push(text(name));
        nodes.push(text(count));
        let row_index = name_index - 1;
        nodes[2].children.push(row_index);
    }

    UiSnapshot::new(nodes)
}

/// A member page: recipient count plus chrome plus member rows.
pub fn member_page(members: &[&str]) -> UiSnapshot {
    let mut nodes = vec![UiNode {
        children: (1..=members.len() + 2).collect(),
        ..UiNode::default()
    }];
    nodes.push(text("2 recipients"));
    nodes.push(clickable_text("Add recipient"));
    nodes.extend(members.iter().map(|m| text(m)));
    UiSnapshot::new(nodes)
}

/// Two-list host application: "Family" (two scroll pages) and
/// "Work friends" (one page).
pub fn demo_script() -> UiScript {
    let mut screens = HashMap::new();

    screens.insert(
        "home".to_string(),
        ScriptScreen {
            pages: vec![UiSnapshot::new(vec![
                UiNode {
                    children: vec![1, 2],
                    ..UiNode::default()
                },
                text("Chats"),
                button("More options"),
            ])],
            taps: vec![TapRule {
                needle: "More options".to_string(),
                goto: "menu".to_string(),
            }],
            back_to: None,
            endless_scroll: false,
        },
    );

    screens.insert(
        "menu".to_string(),
        ScriptScreen {
            pages: vec![UiSnapshot::new(vec![
                UiNode {
                    children: vec![1, 2],
                    ..UiNode::default()
                },
                clickable_text("New group"),
                clickable_text("Broadcast lists"),
            ])],
            taps: vec![TapRule {
                needle: "Broadcast lists".to_string(),
                goto: "broadcasts".to_string(),
            }],
            back_to: Some("home".to_string()),
            endless_scroll: false,
        },
    );

    screens.insert(
        "broadcasts".to_string(),
        ScriptScreen {
            pages: vec![broadcasts_page(&[
                ("Family", "2 recipients"),
                ("Work friends", "3 recipients"),
            ])],
            taps: vec![
                TapRule {
                    needle: "Family".to_string(),
                    goto: "family".to_string(),
                },
                TapRule {
                    needle: "Work friends".to_string(),
                    goto: "work".to_string(),
                },
            ],
            back_to: Some("home".to_string()),
            endless_scroll: false,
        },
    );

    screens.insert(
        "family".to_string(),
        ScriptScreen {
            pages: vec![
                member_page(&["Asha Patel", "+91 99887 76655"]),
                member_page(&["+91 99887 76655", "Charlie Dep"]),
            ],
            taps: vec![],
            back_to: Some("broadcasts".to_string()),
            endless_scroll: false,
        },
    );

    screens.insert(
        "work".to_string(),
        ScriptScreen {
            pages: vec![member_page(&["Asha Patel", "Kiran Rao", "+91 99887 76655"])],
            taps: vec![],
            back_to: Some("broadcasts".to_string()),
            endless_scroll: false,
        },
    );

    UiScript {
        installed_apps: vec![HOST_APP.to_string()],
        start_screen: "home".to_string(),
        screens,
    }
}

/// Directory snapshot matching the demo script's unsaved number.
pub struct StaticDirectory(pub Vec<DirectoryEntry>);

impl StaticDirectory {
    pub fn demo() -> Self {
        Self(vec![DirectoryEntry {
            id: "1".to_string(),
            name: "Bob Verma".to_string(),
            phones: vec!["+919988776655".to_string()],
        }])
    }
}

#[async_trait]
impl DirectoryProvider for StaticDirectory {
    async fn load_entries(&self) -> DomainResult<Vec<DirectoryEntry>> {
        Ok(self.0.clone())
    }
}

/// Sync client that records every payload.
#[derive(Default)]
pub struct RecordingSyncClient {
    pub payloads: Mutex<Vec<SyncPayload>>,
}

#[async_trait]
impl SyncClient for RecordingSyncClient {
    async fn send(&self, payload: &SyncPayload) -> DomainResult<()> {
        self.payloads.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

/// Observer that records every state change and store snapshot.
#[derive(Default)]
pub struct RecordingObserver {
    pub updates: Mutex<Vec<ProgressUpdate>>,
    pub snapshots: Mutex<Vec<Vec<MemberList>>>,
}

impl RunObserver for RecordingObserver {
    fn on_state_change(&self, update: &ProgressUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }

    fn on_lists_changed(&self, lists: &[MemberList]) {
        self.snapshots.lock().unwrap().push(lists.to_vec());
    }
}

/// Minimal driver for scan-bound tests: one member on screen, a scroll
/// that always reports success, and a snapshot counter.
#[derive(Default)]
pub struct EndlessScrollDriver {
    pub snapshots: AtomicU32,
}

#[async_trait]
impl UiDriver for EndlessScrollDriver {
    async fn resolve_host(&self, candidates: &[String]) -> DomainResult<Option<String>> {
        Ok(candidates.first().cloned())
    }

    async fn launch_host(&self, _app_id: &str) -> DomainResult<bool> {
        Ok(true)
    }

    async fn snapshot(&self) -> DomainResult<UiSnapshot> {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        Ok(UiSnapshot::new(vec![
            UiNode {
                children: vec![1],
                ..UiNode::default()
            },
            text("Asha Patel"),
        ]))
    }

    async fn tap(&self, _node: NodeId) -> DomainResult<bool> {
        Ok(true)
    }

    async fn tap_point(&self, _x: i32, _y: i32) -> DomainResult<bool> {
        Ok(true)
    }

    async fn scroll_down(&self) -> DomainResult<bool> {
        Ok(true)
    }

    async fn back(&self) -> DomainResult<()> {
        Ok(())
    }
}
