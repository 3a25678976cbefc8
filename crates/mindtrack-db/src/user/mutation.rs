use crate::util::FlattenTransactionResultExt;
use chrono::Utc;
use mindtrack_entity::user::{ActiveModel, Column, Entity, Model};
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, TransactionTrait};
use std::error::Error;
use uuid::Uuid;

pub struct Mutation;

impl Mutation {
    pub async fn create_user<C: ConnectionTrait>(
        conn: &C,
        oidc_subject: String,
        name: Option<String>,
    ) -> Result<Model, DbErr> {
        let new_user = ActiveModel {
            id: Set(Uuid::new_v4()),
            oidc_subject: Set(oidc_subject),
            name: Set(name),
            created_at: Set(Utc::now().fixed_offset()),
        };

        new_user
            .insert(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to create user"))
    }

    /// Insert a user for `oidc_subject` unless one exists and return the stored row. A concurrent
    /// first sign-in of the same subject resolves to the user the other request created.
    pub async fn create_user_if_absent<C: ConnectionTrait>(
        conn: &C,
        oidc_subject: String,
        name: Option<String>,
    ) -> Result<Model, DbErr> {
        let new_user = ActiveModel {
            id: Set(Uuid::new_v4()),
            oidc_subject: Set(oidc_subject.clone()),
            name: Set(name),
            created_at: Set(Utc::now().fixed_offset()),
        };

        Entity::insert(new_user)
            .on_conflict(OnConflict::column(Column::OidcSubject).do_nothing().clone())
            .do_nothing()
            .exec(conn)
            .await
            .inspect_err(|error| tracing::error!(error = error as &dyn Error, "failed to create user"))?;
        Entity::find()
            .filter(Column::OidcSubject.eq(oidc_subject))
            .one(conn)
            .await?
            .ok_or(DbErr::RecordNotFound("User not found after insertion".to_owned()))
    }

    /// Find the user signed in with `oidc_subject` or create it. The display name is refreshed
    /// whenever the identity provider sends one.
    pub async fn create_or_update_user<C: TransactionTrait>(
        conn: &C,
        oidc_subject: &str,
        name: Option<String>,
    ) -> Result<Model, DbErr> {
        let oidc_subject = oidc_subject.to_owned();
        conn.transaction(|txn| {
            Box::pin(async move {
                let existing = Entity::find()
                    .filter(Column::OidcSubject.eq(&oidc_subject))
                    .one(txn)
                    .await?;

                match existing {
                    Some(user) if name.is_none() || user.name == name => Ok(user),
                    Some(user) => {
                        tracing::debug!(user_id = %user.id, "updating user name");
                        ActiveModel {
                            id: Unchanged(user.id),
                            name: Set(name),
                            ..Default::default()
                        }
                        .update(txn)
                        .await
                    }
                    None => Self::create_user_if_absent(txn, oidc_subject, name).await,
                }
            })
        })
        .await
        .flatten_res()
    }
}
