//! Table merging and merged-group status propagation

use std::collections::{HashSet, VecDeque};

use crate::api::tables::{Table, TableStatus};
use crate::error::{RestoError, Result};

/// Selection state for merging tables to seat a large party
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergePlanner {
    guest_count: u32,
    selected: Vec<String>,
}

impl MergePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guest_count(&self) -> u32 {
        self.guest_count
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Largest capacity among tables that are free right now
    pub fn max_available_capacity(tables: &[Table]) -> u32 {
        tables
            .iter()
            .filter(|t| t.status == TableStatus::Available)
            .map(|t| t.capacity)
            .max()
            .unwrap_or(0)
    }

    /// Merging is offered once no single free table fits the party
    pub fn merge_offered(&self, tables: &[Table]) -> bool {
        self.guest_count > Self::max_available_capacity(tables)
    }

    /// Update the party size; the selection is dropped when merging is no longer offered
    pub fn set_guest_count(&mut self, guests: u32, tables: &[Table]) {
        self.guest_count = guests;
        if !self.merge_offered(tables) {
            self.selected.clear();
        }
    }

    /// Select or deselect a table
    pub fn toggle(&mut self, id: &str) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.to_string());
        }
    }

    /// Seats offered by the selected tables
    pub fn selected_capacity(&self, tables: &[Table]) -> u32 {
        tables
            .iter()
            .filter(|t| self.is_selected(&t.id))
            .map(|t| t.capacity)
            .sum()
    }

    pub fn capacity_met(&self, tables: &[Table]) -> bool {
        self.guest_count > 0 && self.selected_capacity(tables) >= self.guest_count
    }

    /// Table ids and guest count for the merge request
    pub fn request(&self) -> Result<(Vec<String>, u32)> {
        if self.selected.len() < 2 {
            return Err(RestoError::InvalidInput(
                "Select at least 2 tables to merge".to_string(),
            ));
        }
        Ok((self.selected.clone(), self.guest_count))
    }

    pub fn clear(&mut self) {
        self.guest_count = 0;
        self.selected.clear();
    }
}

/// Ids of every table merged with `id`, including itself
///
/// Follows `mergedWith` links in both directions until the group is closed.
pub fn merged_group(tables: &[Table], id: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::from([id.to_string()]);
    seen.insert(id.to_string());

    while let Some(current) = queue.pop_front() {
        let forward = tables
            .iter()
            .filter(|t| t.id == current)
            .flat_map(|t| t.merged_with.iter().cloned());
        let backward = tables
            .iter()
            .filter(|t| t.merged_with.iter().any(|m| *m == current))
            .map(|t| t.id.clone());

        for next in forward.chain(backward).collect::<Vec<_>>() {
            if seen.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }

    // keep list order stable for display
    tables
        .iter()
        .map(|t| t.id.clone())
        .filter(|tid| seen.contains(tid))
        .collect()
}

/// Apply a status to a table and every table in its merged group
///
/// Returns how many local tables changed.
pub fn apply_status(tables: &mut [Table], id: &str, status: TableStatus) -> usize {
    let group: HashSet<String> = merged_group(tables, id).into_iter().collect();
    let mut changed = 0;
    for table in tables.iter_mut().filter(|t| group.contains(&t.id)) {
        table.status = status;
        changed += 1;
    }
    changed
}

/// `Merged with T2, T3`, or `None` when the table stands alone
pub fn merged_label(tables: &[Table], table: &Table) -> Option<String> {
    if table.merged_with.is_empty() {
        return None;
    }
    let names: Vec<String> = table
        .merged_with
        .iter()
        .map(|id| {
            tables
                .iter()
                .find(|t| t.id == *id)
                .map(|t| format!("T{}", t.table_number))
                .unwrap_or_else(|| id.clone())
        })
        .collect();
    Some(format!("Merged with {}", names.join(", ")))
}

/// Confirmation shown after a successful merge
pub fn merge_summary(table_count: usize, guests: u32) -> String {
    format!("Merged {} tables for {} guests", table_count, guests)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(id: &str, capacity: u32, status: TableStatus, merged: &[&str]) -> Table {
        Table {
            id: id.to_string(),
            table_number: id.trim_start_matches('t').to_string(),
            capacity,
            location: "Main hall".to_string(),
            status,
            merged_with: merged.iter().map(|s| s.to_string()).collect(),
            merged_guest_count: None,
        }
    }

    fn floor() -> Vec<Table> {
        vec![
            table("t1", 4, TableStatus::Available, &[]),
            table("t2", 6, TableStatus::Available, &[]),
            table("t3", 8, TableStatus::Occupied, &[]),
            table("t4", 2, TableStatus::Available, &[]),
        ]
    }

    #[test]
    fn test_merge_offered_above_max_free_capacity() {
        let tables = floor();
        assert_eq!(MergePlanner::max_available_capacity(&tables), 6);

        let mut planner = MergePlanner::new();
        planner.set_guest_count(6, &tables);
        assert!(!planner.merge_offered(&tables));

        planner.set_guest_count(9, &tables);
        assert!(planner.merge_offered(&tables));
    }

    #[test]
    fn test_selection_and_capacity() {
        let tables = floor();
        let mut planner = MergePlanner::new();
        planner.set_guest_count(9, &tables);

        planner.toggle("t1");
        assert!(planner.request().is_err());
        assert!(!planner.capacity_met(&tables));

        planner.toggle("t2");
        assert_eq!(planner.selected_capacity(&tables), 10);
        assert!(planner.capacity_met(&tables));
        assert_eq!(
            planner.request().unwrap(),
            (vec!["t1".to_string(), "t2".to_string()], 9)
        );

        planner.toggle("t1");
        assert_eq!(planner.selected(), &["t2".to_string()]);
    }

    #[test]
    fn test_selection_cleared_when_merge_not_needed() {
        let tables = floor();
        let mut planner = MergePlanner::new();
        planner.set_guest_count(12, &tables);
        planner.toggle("t1");
        planner.toggle("t2");

        planner.set_guest_count(3, &tables);
        assert!(planner.selected().is_empty());
    }

    #[test]
    fn test_merged_group_is_transitive_both_ways() {
        // t1 -> t2, t3 -> t2, t4 alone
        let tables = vec![
            table("t1", 4, TableStatus::Occupied, &["t2"]),
            table("t2", 4, TableStatus::Occupied, &[]),
            table("t3", 4, TableStatus::Occupied, &["t2"]),
            table("t4", 4, TableStatus::Occupied, &[]),
        ];
        assert_eq!(merged_group(&tables, "t3"), vec!["t1", "t2", "t3"]);
        assert_eq!(merged_group(&tables, "t4"), vec!["t4"]);
    }

    #[test]
    fn test_apply_status_propagates_to_group() {
        let mut tables = vec![
            table("t1", 4, TableStatus::Occupied, &["t2"]),
            table("t2", 4, TableStatus::Occupied, &["t1"]),
            table("t3", 4, TableStatus::Occupied, &[]),
        ];
        let changed = apply_status(&mut tables, "t2", TableStatus::Available);

        assert_eq!(changed, 2);
        assert_eq!(tables[0].status, TableStatus::Available);
        assert_eq!(tables[1].status, TableStatus::Available);
        assert_eq!(tables[2].status, TableStatus::Occupied);
    }

    #[test]
    fn test_merge_summary() {
        assert_eq!(merge_summary(3, 10), "Merged 3 tables for 10 guests");
    }

    #[test]
    fn test_merged_label_resolves_numbers() {
        let tables = vec![
            table("t1", 4, TableStatus::Occupied, &["t2", "gone"]),
            table("t2", 4, TableStatus::Occupied, &[]),
        ];
        assert_eq!(
            merged_label(&tables, &tables[0]).as_deref(),
            Some("Merged with T2, gone")
        );
        assert_eq!(merged_label(&tables, &tables[1]), None);
    }
}
