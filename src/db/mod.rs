pub(crate) mod latency;
pub(crate) mod models;
pub(crate) mod types;

use std::collections::HashMap;

use tokio::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::core::metrics;
use crate::db::latency::Latency;
use crate::db::models::{Exercise, Lesson, SubUnit, Unit};

/// A row that lives in one of the four curriculum tables.
pub(crate) trait Record: Clone {
    const COLLECTION: &'static str;
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn order(&self) -> i32;
}

/// Insertion-ordered rows with an id index.
#[derive(Debug)]
pub(crate) struct Table<R> {
    rows: Vec<R>,
    index: HashMap<String, usize>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new(), index: HashMap::new() }
    }
}

impl<R: Record> Table<R> {
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&R> {
        self.index.get(id).map(|&position| &self.rows[position])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut R> {
        match self.index.get(id) {
            Some(&position) => Some(&mut self.rows[position]),
            None => None,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.iter()
    }

    pub(crate) fn select(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        self.rows.iter().filter(|row| predicate(row)).cloned().collect()
    }

    /// Fresh `<prefix>-<uuid>` id that is not yet present in the table.
    pub(crate) fn next_id(&self) -> String {
        loop {
            let candidate = format!("{}-{}", R::ID_PREFIX, Uuid::new_v4());
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    pub(crate) fn insert(&mut self, row: R) {
        debug_assert!(!self.contains(row.id()), "duplicate id in {}", R::COLLECTION);
        self.index.insert(row.id().to_string(), self.rows.len());
        self.rows.push(row);
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<R> {
        let position = self.index.remove(id)?;
        let row = self.rows.remove(position);
        for (offset, shifted) in self.rows[position..].iter().enumerate() {
            self.index.insert(shifted.id().to_string(), position + offset);
        }
        Some(row)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) units: Table<Unit>,
    pub(crate) sub_units: Table<SubUnit>,
    pub(crate) lessons: Table<Lesson>,
    pub(crate) exercises: Table<Exercise>,
}

impl Tables {
    /// Re-derives `Unit::sub_unit_ids` from the sub-unit table, sorted by order.
    pub(crate) fn refresh_sub_unit_ids(&mut self, unit_id: &str) {
        let mut children: Vec<(i32, String)> = self
            .sub_units
            .iter()
            .filter(|sub_unit| sub_unit.unit_id == unit_id)
            .map(|sub_unit| (sub_unit.order, sub_unit.id.clone()))
            .collect();
        children.sort();

        if let Some(unit) = self.units.get_mut(unit_id) {
            unit.sub_unit_ids = children.into_iter().map(|(_, id)| id).collect();
        }
    }

    pub(crate) fn remove_lesson_tree(&mut self, lesson_id: &str) -> usize {
        let exercise_ids: Vec<String> = self
            .exercises
            .iter()
            .filter(|exercise| exercise.lesson_id == lesson_id)
            .map(|exercise| exercise.id.clone())
            .collect();
        let mut removed = 0;
        for exercise_id in &exercise_ids {
            removed += usize::from(self.exercises.remove(exercise_id).is_some());
        }
        removed + usize::from(self.lessons.remove(lesson_id).is_some())
    }

    pub(crate) fn remove_sub_unit_tree(&mut self, sub_unit_id: &str) -> usize {
        let lesson_ids: Vec<String> = self
            .lessons
            .iter()
            .filter(|lesson| lesson.sub_unit_id == sub_unit_id)
            .map(|lesson| lesson.id.clone())
            .collect();
        let mut removed = 0;
        for lesson_id in &lesson_ids {
            removed += self.remove_lesson_tree(lesson_id);
        }
        match self.sub_units.remove(sub_unit_id) {
            Some(sub_unit) => {
                self.refresh_sub_unit_ids(&sub_unit.unit_id);
                removed + 1
            }
            None => removed,
        }
    }

    pub(crate) fn remove_unit_tree(&mut self, unit_id: &str) -> usize {
        let sub_unit_ids: Vec<String> = self
            .sub_units
            .iter()
            .filter(|sub_unit| sub_unit.unit_id == unit_id)
            .map(|sub_unit| sub_unit.id.clone())
            .collect();
        let mut removed = 0;
        for sub_unit_id in &sub_unit_ids {
            removed += self.remove_sub_unit_tree(sub_unit_id);
        }
        removed + usize::from(self.units.remove(unit_id).is_some())
    }
}

/// In-process curriculum store: four tables behind one lock, plus a write gate
/// that serialises validate-then-commit sequences.
pub(crate) struct MemoryDb {
    tables: RwLock<Tables>,
    write_gate: Mutex<()>,
    latency: Latency,
}

impl MemoryDb {
    pub(crate) fn new(latency: Latency) -> Self {
        Self { tables: RwLock::new(Tables::default()), write_gate: Mutex::new(()), latency }
    }

    pub(crate) fn latency(&self) -> Latency {
        self.latency
    }

    /// Held by request handlers across "read siblings, validate, write".
    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }

    /// Marks the start of a storage call: records it and waits out the simulated latency.
    pub(crate) async fn begin(&self, collection: &'static str, op: &'static str) {
        metrics::record_store_op(collection, op);
        self.latency.pause().await;
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    fn lesson(id: &str, sub_unit_id: &str, order: i32) -> Lesson {
        let now = primitive_now_utc();
        Lesson {
            id: id.to_string(),
            unit_id: "unit-1".to_string(),
            sub_unit_id: sub_unit_id.to_string(),
            title: format!("Lesson {order}"),
            order,
            estimated_time: 10,
            objectives: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut table = Table::default();
        table.insert(lesson("a", "s", 1));
        table.insert(lesson("b", "s", 2));
        table.insert(lesson("c", "s", 3));

        let removed = table.remove("a").expect("removed");
        assert_eq!(removed.id, "a");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("b").map(|row| row.order), Some(2));
        assert_eq!(table.get("c").map(|row| row.order), Some(3));
        assert!(table.get("a").is_none());
        assert!(table.remove("a").is_none());
    }

    #[test]
    fn next_id_uses_collection_prefix() {
        let table: Table<Lesson> = Table::default();
        let id = table.next_id();
        assert!(id.starts_with("lesson-"));
        assert_ne!(id, table.next_id());
    }
}
