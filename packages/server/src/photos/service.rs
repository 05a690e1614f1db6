use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel, QueryOrder, Set,
};

use crate::entity::photo;

/// Result of an operation addressed to a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    /// No record has the requested id.
    NotFound,
}

/// Record operations on the `photos` table.
pub struct PhotoService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> PhotoService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert one row per path, all sharing `description`.
    ///
    /// Rows that collide with an existing key are skipped. Returns the number
    /// of rows inserted.
    pub async fn create_many(
        &self,
        description: Option<String>,
        paths: &[String],
    ) -> Result<u64, DbErr> {
        if paths.is_empty() {
            return Ok(0);
        }

        let models = paths.iter().map(|path| photo::ActiveModel {
            description: Set(description.clone()),
            photo: Set(path.clone()),
            ..Default::default()
        });

        let result = photo::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(photo::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await;

        match result {
            Ok(inserted) => Ok(inserted),
            Err(DbErr::RecordNotInserted) => Ok(0),
            Err(e) => Err(e),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<photo::Model>, DbErr> {
        photo::Entity::find()
            .order_by_asc(photo::Column::Id)
            .all(self.conn)
            .await
    }

    pub async fn find(&self, id: i32) -> Result<Option<photo::Model>, DbErr> {
        photo::Entity::find_by_id(id).one(self.conn).await
    }

    /// Overwrite both fields of an existing record.
    pub async fn update(
        &self,
        id: i32,
        description: Option<String>,
        photo_paths: String,
    ) -> Result<Outcome<photo::Model>, DbErr> {
        match self.find(id).await? {
            Some(existing) => Ok(Outcome::Done(
                self.replace(existing, description, photo_paths).await?,
            )),
            None => Ok(Outcome::NotFound),
        }
    }

    /// Overwrite both fields of a record the caller has already loaded.
    pub async fn replace(
        &self,
        existing: photo::Model,
        description: Option<String>,
        photo_paths: String,
    ) -> Result<photo::Model, DbErr> {
        let mut active = existing.into_active_model();
        active.description = Set(description);
        active.photo = Set(photo_paths);
        active.update(self.conn).await
    }

    /// Permanently remove a record.
    pub async fn delete(&self, id: i32) -> Result<Outcome<()>, DbErr> {
        if self.find(id).await?.is_none() {
            return Ok(Outcome::NotFound);
        }

        photo::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(Outcome::Done(()))
    }
}
