//! Request and response bodies shared by several handler modules.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a created or deleted resource.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdResponse {
    #[schema(example = 1)]
    pub id: i64,
}
