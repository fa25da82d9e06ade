//! Generic persistence primitives shared by every entity.
//!
//! Each function works on a pooled `DatabaseConnection` as well as on a
//! `DatabaseTransaction`, so services compose them inside one unit of work.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, Iterable,
    PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder,
};

use crate::errors::ModelError;

/// Primary key value type of entity `E`.
pub type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Model type produced by active model `A`.
pub type ModelOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Model;

/// Fetch one row by primary key.
pub async fn get<E, C>(db: &C, id: PrimaryKeyOf<E>) -> Result<Option<E::Model>, ModelError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    Ok(E::find_by_id(id).one(db).await?)
}

/// Fetch every row, ordered by primary key.
pub async fn list<E, C>(db: &C) -> Result<Vec<E::Model>, ModelError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let mut select = E::find();
    for key in E::PrimaryKey::iter() {
        select = select.order_by_asc(key.into_column());
    }
    Ok(select.all(db).await?)
}

/// Insert a new row built from `am`.
pub async fn insert<A, C>(db: &C, am: A) -> Result<ModelOf<A>, ModelError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    ModelOf<A>: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    Ok(am.insert(db).await?)
}

/// Persist the changed columns of `am`.
pub async fn update<A, C>(db: &C, am: A) -> Result<ModelOf<A>, ModelError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    ModelOf<A>: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    Ok(am.update(db).await?)
}

/// Remove one row by primary key. Returns `false` when nothing matched.
pub async fn delete<E, C>(db: &C, id: PrimaryKeyOf<E>) -> Result<bool, ModelError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let res = E::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
