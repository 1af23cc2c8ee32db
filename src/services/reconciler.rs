//! Cross-list reconciliation: the common-members aggregate.

use std::collections::{HashMap, HashSet};

use crate::domain::models::{Member, MemberList};

/// Display name of the aggregate list, embedding its member count.
pub fn aggregate_name(count: usize) -> String {
    format!("Common members ({count})")
}

/// Computes the aggregate of members appearing in at least two source
/// lists, or `None` when nothing qualifies.
///
/// Members of all non-aggregate lists are grouped by identity key in
/// first-encountered order. Groups of two or more elect a representative
/// by score (non-empty phone outweighs name length, longer names win, ties
/// go to the first encountered); representatives are then deduplicated by
/// case-insensitive name so near-duplicates from different groups cannot
/// both surface. The result is deterministic for a given store, which
/// makes reconciliation idempotent under unchanged inputs.
pub fn common_members(lists: &[MemberList]) -> Option<MemberList> {
    let sources: Vec<&MemberList> = lists.iter().filter(|l| !l.is_aggregate).collect();
    if sources.len() < 2 {
        return None;
    }

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Member>> = HashMap::new();
    for list in &sources {
        for member in &list.members {
            let key = member.identity_key();
            if key.is_empty() {
                continue;
            }
            groups
                .entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(member);
        }
    }

    let mut representatives: Vec<Member> = Vec::new();
    let mut seen_names: HashSet<String> = HashSet::new();
    for key in &order {
        let group = &groups[key];
        if group.len() < 2 {
            continue;
        }

        let mut best = group[0];
        for candidate in &group[1..] {
            if candidate.score() > best.score() {
                best = candidate;
            }
        }

        if seen_names.insert(best.name.to_lowercase()) {
            representatives.push(best.clone());
        }
    }

    if representatives.is_empty() {
        return None;
    }
    Some(MemberList::aggregate(
        aggregate_name(representatives.len()),
        representatives,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(name: &str, members: &[(&str, &str)]) -> MemberList {
        let mut list = MemberList::new(name);
        for (member_name, phone) in members {
            list.push_unique(Member::new(*member_name, *phone));
        }
        list
    }

    #[test]
    fn test_common_member_appears_exactly_once() {
        let lists = vec![
            list("A", &[("Rahul", "9876543210"), ("Asha", "")]),
            list("B", &[("Rahul M", "+91 98765 43210"), ("Kiran", "")]),
            list("C", &[("Asha", "")]),
        ];

        let aggregate = common_members(&lists).unwrap();
        assert!(aggregate.is_aggregate);
        assert_eq!(aggregate.members.len(), 2);
        // One representative per identity key, no matter how many lists.
        let keys: HashSet<String> = aggregate.members.iter().map(Member::identity_key).collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_scoring_prefers_phone_then_longer_name() {
        // Same phone key in three lists; the phoneless long name loses to
        // any entry carrying a phone, and among those the longer name wins.
        let lists = vec![
            list("A", &[("Amit", "9988776655")]),
            list("B", &[("Amit", "9988776655")]),
            list("C", &[("A. Kumar", "")]),
        ];

        let aggregate = common_members(&lists).unwrap();
        assert_eq!(aggregate.members.len(), 1);
        assert_eq!(aggregate.members[0].name, "Amit");
        assert_eq!(aggregate.members[0].phone, "9988776655");
    }

    #[test]
    fn test_tie_breaks_to_first_encountered() {
        let lists = vec![
            list("A", &[("Asha", "9123456789")]),
            list("B", &[("Ashb", "9123456789")]),
        ];

        let aggregate = common_members(&lists).unwrap();
        assert_eq!(aggregate.members[0].name, "Asha");
    }

    #[test]
    fn test_name_only_members_match_case_insensitively() {
        let lists = vec![list("A", &[("Kiran", "")]), list("B", &[("  KIRAN ", "")])];

        let aggregate = common_members(&lists).unwrap();
        assert_eq!(aggregate.members.len(), 1);
    }

    #[test]
    fn test_representatives_dedupe_by_name_across_groups() {
        // Two distinct phone keys both resolve to the display name "Rahul";
        // only the first representative survives.
        let lists = vec![
            list("A", &[("Rahul", "9876543210"), ("Rahul", "9000000000")]),
            list("B", &[("Rahul X", "9876543210"), ("Rahul Y", "9000000000")]),
        ];

        let aggregate = common_members(&lists).unwrap();
        let rahuls = aggregate
            .members
            .iter()
            .filter(|m| m.name.to_lowercase().starts_with("rahul"))
            .count();
        assert_eq!(aggregate.members.len(), rahuls);
        assert_eq!(aggregate.members.len(), 2);
    }

    #[test]
    fn test_no_overlap_produces_nothing() {
        let lists = vec![list("A", &[("One", "")]), list("B", &[("Two", "")])];
        assert!(common_members(&lists).is_none());
    }

    #[test]
    fn test_fewer_than_two_sources_produces_nothing() {
        let lists = vec![list("A", &[("One", ""), ("Two", "")])];
        assert!(common_members(&lists).is_none());
    }

    #[test]
    fn test_prior_aggregate_is_ignored_as_source() {
        let mut lists = vec![
            list("A", &[("Rahul", "9876543210")]),
            list("B", &[("Rahul", "9876543210")]),
        ];
        lists.push(MemberList::aggregate(
            aggregate_name(1),
            vec![Member::new("Rahul", "9876543210")],
        ));

        let aggregate = common_members(&lists).unwrap();
        assert_eq!(aggregate.members.len(), 1);
    }

    #[test]
    fn test_idempotent_member_set() {
        let lists = vec![
            list("A", &[("Rahul", "9876543210"), ("Asha", "")]),
            list("B", &[("Rahul", "9876543210"), ("Asha", "")]),
        ];

        let first = common_members(&lists).unwrap();
        let second = common_members(&lists).unwrap();
        let names = |l: &MemberList| {
            l.members
                .iter()
                .map(|m| (m.name.clone(), m.phone.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&first), names(&second));
        assert_eq!(first.name, second.name);
    }
}
