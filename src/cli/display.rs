//! Table rendering for CLI output.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};

use crate::domain::models::MemberList;

/// Borderless table with uppercase headers.
fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// One row per list: name, member count, aggregate marker.
pub fn lists_table(lists: &[MemberList]) -> Table {
    let mut table = list_table(&["List", "Members", "Aggregate"]);
    for list in lists {
        table.add_row(vec![
            list.name.clone(),
            list.members.len().to_string(),
            if list.is_aggregate { "yes" } else { "" }.to_string(),
        ]);
    }
    table
}

/// One row per member of a single list.
pub fn members_table(list: &MemberList) -> Table {
    let mut table = list_table(&["Name", "Phone"]);
    for member in &list.members {
        table.add_row(vec![member.name.clone(), member.phone.clone()]);
    }
    table
}
