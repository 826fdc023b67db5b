use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::schemas::OrderInput;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubUnitCreate {
    /// Optional echo of the parent in the path; must agree with it.
    #[serde(default)]
    pub(crate) unit_id: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub(crate) theme: String,
    #[serde(default)]
    pub(crate) order: OrderInput,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub(crate) estimated_total_time: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubUnitUpdate {
    #[serde(default)]
    pub(crate) unit_id: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub(crate) theme: Option<String>,
    #[serde(default)]
    pub(crate) order: Option<OrderInput>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub(crate) estimated_total_time: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubUnitResponse {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) title: String,
    pub(crate) theme: String,
    pub(crate) order: i32,
    pub(crate) estimated_total_time: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl SubUnitResponse {
    pub(crate) fn from_db(sub_unit: crate::db::models::SubUnit) -> Self {
        Self {
            id: sub_unit.id,
            unit_id: sub_unit.unit_id,
            title: sub_unit.title,
            theme: sub_unit.theme,
            order: sub_unit.order,
            estimated_total_time: sub_unit.estimated_total_time,
            created_at: format_primitive(sub_unit.created_at),
            updated_at: format_primitive(sub_unit.updated_at),
        }
    }
}
