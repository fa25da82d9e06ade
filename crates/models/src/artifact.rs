use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, repository, wizard};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artifact")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub image_url: String,
    pub owner_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(wizard::Entity)
                .from(Column::OwnerId)
                .to(wizard::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
        }
    }
}

impl Related<wizard::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate(name: &str, description: &str, image_url: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name is required.".into())); }
    if description.trim().is_empty() { return Err(errors::ModelError::Validation("description is required.".into())); }
    if image_url.trim().is_empty() { return Err(errors::ModelError::Validation("imageUrl is required.".into())); }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    id: &str,
    name: &str,
    description: &str,
    image_url: &str,
    owner_id: Option<i32>,
) -> Result<Model, errors::ModelError> {
    validate(name, description, image_url)?;
    let am = ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        image_url: Set(image_url.to_string()),
        owner_id: Set(owner_id),
    };
    repository::insert(db, am).await
}

/// Artifacts currently owned by `wizard_id`, ordered by id.
pub async fn owned_by<C: ConnectionTrait>(db: &C, wizard_id: i32) -> Result<Vec<Model>, errors::ModelError> {
    let rows = Entity::find()
        .filter(Column::OwnerId.eq(wizard_id))
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

/// Artifacts that have any owner, ordered by id.
pub async fn all_owned<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, errors::ModelError> {
    let rows = Entity::find()
        .filter(Column::OwnerId.is_not_null())
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

/// Number of artifacts owned by `wizard_id`.
pub async fn count_owned_by<C: ConnectionTrait>(db: &C, wizard_id: i32) -> Result<u64, errors::ModelError> {
    Ok(Entity::find().filter(Column::OwnerId.eq(wizard_id)).count(db).await?)
}

/// Clear the owner of every artifact held by `wizard_id`. Returns the number of rows touched.
pub async fn detach_all<C: ConnectionTrait>(db: &C, wizard_id: i32) -> Result<u64, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::OwnerId, Expr::value(Option::<i32>::None))
        .filter(Column::OwnerId.eq(wizard_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Point `artifact` at a new owner (or none) and persist it.
pub async fn set_owner<C: ConnectionTrait>(db: &C, artifact: Model, owner_id: Option<i32>) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = artifact.into();
    am.owner_id = Set(owner_id);
    Ok(am.update(db).await?)
}
