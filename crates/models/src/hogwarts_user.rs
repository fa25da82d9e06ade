use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, repository};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hogwarts_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// argon2 PHC string
    pub password: String,
    pub enabled: bool,
    /// Space separated, e.g. `"admin user"`.
    pub roles: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    if username.trim().is_empty() { return Err(errors::ModelError::Validation("username is required.".into())); }
    Ok(())
}

pub fn validate_roles(roles: &str) -> Result<(), errors::ModelError> {
    if roles.trim().is_empty() { return Err(errors::ModelError::Validation("roles are required.".into())); }
    Ok(())
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::Username.eq(username)).one(db).await?)
}

/// Insert a user. `password_hash` must already be hashed by the caller.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password_hash: &str,
    enabled: bool,
    roles: &str,
) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    validate_roles(roles)?;
    if password_hash.trim().is_empty() { return Err(errors::ModelError::Validation("password is required.".into())); }
    let am = ActiveModel {
        username: Set(username.to_string()),
        password: Set(password_hash.to_string()),
        enabled: Set(enabled),
        roles: Set(roles.to_string()),
        ..Default::default()
    };
    repository::insert(db, am).await
}
