use crate::core::time::{now_after, primitive_now_utc};
use crate::db::models::Unit;
use crate::db::{MemoryDb, Record};
use crate::repositories::{DeleteMode, StoreError};

const ENTITY: &str = "Unit";

pub(crate) struct CreateUnit<'a> {
    pub(crate) title: &'a str,
    pub(crate) order: i32,
    pub(crate) description: Option<&'a str>,
    pub(crate) thumbnail_url: Option<&'a str>,
    pub(crate) is_published: bool,
}

#[derive(Default)]
pub(crate) struct UpdateUnit {
    pub(crate) title: Option<String>,
    pub(crate) order: Option<i32>,
    /// `Some(None)` clears the field.
    pub(crate) description: Option<Option<String>>,
    pub(crate) thumbnail_url: Option<Option<String>>,
    pub(crate) is_published: Option<bool>,
}

pub(crate) async fn list(db: &MemoryDb) -> Vec<Unit> {
    db.begin(Unit::COLLECTION, "list").await;
    db.read().await.units.select(|_| true)
}

pub(crate) async fn fetch_one_by_id(db: &MemoryDb, unit_id: &str) -> Result<Unit, StoreError> {
    db.begin(Unit::COLLECTION, "get").await;
    db.read().await.units.get(unit_id).cloned().ok_or_else(|| StoreError::not_found(ENTITY, unit_id))
}

pub(crate) async fn create(db: &MemoryDb, params: CreateUnit<'_>) -> Unit {
    db.begin(Unit::COLLECTION, "create").await;
    let mut tables = db.write().await;
    let now = primitive_now_utc();
    let unit = Unit {
        id: tables.units.next_id(),
        title: params.title.to_string(),
        order: params.order,
        description: params.description.map(str::to_string),
        thumbnail_url: params.thumbnail_url.map(str::to_string),
        is_published: params.is_published,
        sub_unit_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    tables.units.insert(unit.clone());
    unit
}

pub(crate) async fn update(
    db: &MemoryDb,
    unit_id: &str,
    params: UpdateUnit,
) -> Result<Unit, StoreError> {
    db.begin(Unit::COLLECTION, "update").await;
    let mut tables = db.write().await;
    let unit = tables.units.get_mut(unit_id).ok_or_else(|| StoreError::not_found(ENTITY, unit_id))?;

    if let Some(title) = params.title {
        unit.title = title;
    }
    if let Some(order) = params.order {
        unit.order = order;
    }
    if let Some(description) = params.description {
        unit.description = description;
    }
    if let Some(thumbnail_url) = params.thumbnail_url {
        unit.thumbnail_url = thumbnail_url;
    }
    if let Some(is_published) = params.is_published {
        unit.is_published = is_published;
    }
    unit.updated_at = now_after(unit.updated_at);

    Ok(unit.clone())
}

/// Returns the number of rows removed, the unit included.
pub(crate) async fn delete(
    db: &MemoryDb,
    unit_id: &str,
    mode: DeleteMode,
) -> Result<usize, StoreError> {
    db.begin(Unit::COLLECTION, "delete").await;
    let mut tables = db.write().await;
    if !tables.units.contains(unit_id) {
        return Err(StoreError::not_found(ENTITY, unit_id));
    }

    let children = tables.sub_units.iter().filter(|sub_unit| sub_unit.unit_id == unit_id).count();
    if children > 0 && mode == DeleteMode::Restrict {
        return Err(StoreError::HasChildren {
            entity: ENTITY,
            id: unit_id.to_string(),
            count: children,
            children: "sub-units",
        });
    }

    Ok(tables.remove_unit_tree(unit_id))
}
