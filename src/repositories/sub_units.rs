use crate::core::time::{now_after, primitive_now_utc};
use crate::db::models::SubUnit;
use crate::db::{MemoryDb, Record};
use crate::repositories::{DeleteMode, StoreError};

const ENTITY: &str = "SubUnit";

pub(crate) struct CreateSubUnit<'a> {
    pub(crate) unit_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) theme: &'a str,
    pub(crate) order: i32,
    pub(crate) estimated_total_time: i32,
}

#[derive(Default)]
pub(crate) struct UpdateSubUnit {
    pub(crate) title: Option<String>,
    pub(crate) theme: Option<String>,
    pub(crate) order: Option<i32>,
    pub(crate) estimated_total_time: Option<i32>,
}

pub(crate) async fn list_for_unit(db: &MemoryDb, unit_id: &str) -> Vec<SubUnit> {
    db.begin(SubUnit::COLLECTION, "list").await;
    db.read().await.sub_units.select(|sub_unit| sub_unit.unit_id == unit_id)
}

pub(crate) async fn fetch_one_by_id(
    db: &MemoryDb,
    sub_unit_id: &str,
) -> Result<SubUnit, StoreError> {
    db.begin(SubUnit::COLLECTION, "get").await;
    db.read()
        .await
        .sub_units
        .get(sub_unit_id)
        .cloned()
        .ok_or_else(|| StoreError::not_found(ENTITY, sub_unit_id))
}

pub(crate) async fn create(
    db: &MemoryDb,
    params: CreateSubUnit<'_>,
) -> Result<SubUnit, StoreError> {
    db.begin(SubUnit::COLLECTION, "create").await;
    let mut tables = db.write().await;
    if !tables.units.contains(params.unit_id) {
        return Err(StoreError::not_found("Unit", params.unit_id));
    }

    let now = primitive_now_utc();
    let sub_unit = SubUnit {
        id: tables.sub_units.next_id(),
        unit_id: params.unit_id.to_string(),
        title: params.title.to_string(),
        theme: params.theme.to_string(),
        order: params.order,
        estimated_total_time: params.estimated_total_time,
        created_at: now,
        updated_at: now,
    };
    tables.sub_units.insert(sub_unit.clone());
    tables.refresh_sub_unit_ids(params.unit_id);

    Ok(sub_unit)
}

pub(crate) async fn update(
    db: &MemoryDb,
    sub_unit_id: &str,
    params: UpdateSubUnit,
) -> Result<SubUnit, StoreError> {
    db.begin(SubUnit::COLLECTION, "update").await;
    let mut tables = db.write().await;
    let sub_unit = tables
        .sub_units
        .get_mut(sub_unit_id)
        .ok_or_else(|| StoreError::not_found(ENTITY, sub_unit_id))?;

    if let Some(title) = params.title {
        sub_unit.title = title;
    }
    if let Some(theme) = params.theme {
        sub_unit.theme = theme;
    }
    if let Some(order) = params.order {
        sub_unit.order = order;
    }
    if let Some(estimated_total_time) = params.estimated_total_time {
        sub_unit.estimated_total_time = estimated_total_time;
    }
    sub_unit.updated_at = now_after(sub_unit.updated_at);

    let updated = sub_unit.clone();
    if params.order.is_some() {
        tables.refresh_sub_unit_ids(&updated.unit_id);
    }
    Ok(updated)
}

pub(crate) async fn delete(
    db: &MemoryDb,
    sub_unit_id: &str,
    mode: DeleteMode,
) -> Result<usize, StoreError> {
    db.begin(SubUnit::COLLECTION, "delete").await;
    let mut tables = db.write().await;
    if !tables.sub_units.contains(sub_unit_id) {
        return Err(StoreError::not_found(ENTITY, sub_unit_id));
    }

    let children = tables.lessons.iter().filter(|lesson| lesson.sub_unit_id == sub_unit_id).count();
    if children > 0 && mode == DeleteMode::Restrict {
        return Err(StoreError::HasChildren {
            entity: ENTITY,
            id: sub_unit_id.to_string(),
            count: children,
            children: "lessons",
        });
    }

    Ok(tables.remove_sub_unit_tree(sub_unit_id))
}
