//! MongoDB 사용자 저장소
//!
//! `users` 컬렉션을 사용합니다.
//!
//! - **인덱스**: kakao_id(unique, sparse), google_id(unique, sparse), refresh_token(sparse)
//! - **생성**: 프로바이더 신원 필터 + `$setOnInsert` upsert 로 중복 생성을 막습니다
//! - **토큰 교체**: `_id`와 기존 토큰을 함께 필터링하는 `update_one`으로 compare-and-set

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, to_bson, to_document, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::db::Database;
use crate::domain::entities::users::user::{provider_field, User};
use crate::domain::models::oauth::ProviderProfile;
use crate::errors::{AppError, AppResult};
use crate::repositories::users::UserStore;

const COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoUserStore {
    db: Arc<Database>,
}

fn store_error(e: impl std::fmt::Display) -> AppError {
    AppError::UserStoreFailure(e.to_string())
}

fn timestamp(value: DateTime<Utc>) -> AppResult<Bson> {
    to_bson(&value).map_err(store_error)
}

impl MongoUserStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<User> {
        self.db.get_database().collection::<User>(COLLECTION)
    }

    /// 컬렉션 인덱스를 생성합니다. 기동 시 한 번 호출합니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let unique_sparse = |name: &str| {
            IndexOptions::builder()
                .unique(true)
                .sparse(true)
                .name(name.to_string())
                .build()
        };

        let kakao_index = IndexModel::builder()
            .keys(doc! { "kakao_id": 1 })
            .options(unique_sparse("kakao_id_unique"))
            .build();

        let google_index = IndexModel::builder()
            .keys(doc! { "google_id": 1 })
            .options(unique_sparse("google_id_unique"))
            .build();

        let refresh_index = IndexModel::builder()
            .keys(doc! { "refresh_token": 1 })
            .options(IndexOptions::builder()
                .sparse(true)
                .name("refresh_token_lookup".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes(vec![kakao_index, google_index, refresh_index])
            .await
            .map_err(store_error)?;

        log::info!("✅ users 컬렉션 인덱스 생성 완료");
        Ok(())
    }

    fn identity_filter(profile: &ProviderProfile) -> Document {
        let mut filter = Document::new();
        filter.insert(provider_field(profile.provider), profile.provider_user_id.as_str());
        filter
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_or_create_by_provider_id(&self, profile: &ProviderProfile) -> AppResult<User> {
        let filter = Self::identity_filter(profile);
        let new_user = User::from_profile(profile, Utc::now());
        let insert_doc = to_document(&new_user).map_err(store_error)?;

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let result = self.collection()
            .find_one_and_update(filter.clone(), doc! { "$setOnInsert": insert_doc })
            .with_options(options)
            .await;

        match result {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(store_error("upsert returned no document")),
            Err(e) => {
                // 동시 upsert 가 unique 인덱스에 걸린 경우 먼저 생성된 레코드를 사용
                log::warn!("사용자 upsert 충돌, 재조회: {}", e);
                self.collection()
                    .find_one(filter)
                    .await
                    .map_err(store_error)?
                    .ok_or_else(|| store_error(e))
            }
        }
    }

    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<User>> {
        self.collection()
            .find_one(doc! { "_id": user_id })
            .await
            .map_err(store_error)
    }

    async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<User>> {
        self.collection()
            .find_one(doc! { "refresh_token": token })
            .await
            .map_err(store_error)
    }

    async fn set_refresh_token(&self, user_id: &str, token: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        let result = self.collection()
            .update_one(
                doc! { "_id": user_id },
                doc! { "$set": {
                    "refresh_token": token,
                    "refresh_token_expires_at": timestamp(expires_at)?,
                    "updated_at": timestamp(Utc::now())?,
                }},
            )
            .await
            .map_err(store_error)?;

        if result.matched_count == 0 {
            return Err(store_error(format!("user {} not found", user_id)));
        }
        Ok(())
    }

    async fn replace_refresh_token(
        &self,
        user_id: &str,
        expected: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = self.collection()
            .update_one(
                doc! { "_id": user_id, "refresh_token": expected },
                doc! { "$set": {
                    "refresh_token": new_token,
                    "refresh_token_expires_at": timestamp(expires_at)?,
                    "updated_at": timestamp(Utc::now())?,
                }},
            )
            .await
            .map_err(store_error)?;

        Ok(result.matched_count == 1)
    }

    async fn clear_refresh_token(&self, user_id: &str) -> AppResult<()> {
        self.collection()
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$unset": { "refresh_token": "", "refresh_token_expires_at": "" },
                    "$set": { "updated_at": timestamp(Utc::now())? },
                },
            )
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
