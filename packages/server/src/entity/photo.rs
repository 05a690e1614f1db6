use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A description paired with one stored photo path.
///
/// Rows created by a single upload share the description and each carry one
/// path. After an update, `photo` may hold several comma-joined paths.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub photo: String,
}

impl ActiveModelBehavior for ActiveModel {}
