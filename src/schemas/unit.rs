use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::schemas::OrderInput;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnitCreate {
    #[serde(default)]
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) order: OrderInput,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) thumbnail_url: Option<String>,
    #[serde(default)]
    pub(crate) is_published: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnitUpdate {
    #[serde(default)]
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) order: Option<OrderInput>,
    #[serde(default, deserialize_with = "crate::schemas::nullable")]
    pub(crate) description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::schemas::nullable")]
    pub(crate) thumbnail_url: Option<Option<String>>,
    #[serde(default)]
    pub(crate) is_published: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnitResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) order: i32,
    pub(crate) description: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) is_published: bool,
    pub(crate) sub_unit_ids: Vec<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl UnitResponse {
    pub(crate) fn from_db(unit: crate::db::models::Unit) -> Self {
        Self {
            id: unit.id,
            title: unit.title,
            order: unit.order,
            description: unit.description,
            thumbnail_url: unit.thumbnail_url,
            is_published: unit.is_published,
            sub_unit_ids: unit.sub_unit_ids,
            created_at: format_primitive(unit.created_at),
            updated_at: format_primitive(unit.updated_at),
        }
    }
}
