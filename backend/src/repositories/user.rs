//! Accounts and their body profile

use super::{decimal_to_f64, to_decimal};
use anyhow::Result;
use chrono::{DateTime, Utc};
use fittrack_shared::UserProfile;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub weight_kg: Decimal,
    pub height_cm: Decimal,
    pub age: i32,
    pub gender: String,
    pub activity_level: String,
    pub goal: String,
    pub target_weight_kg: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn profile(&self) -> Result<UserProfile> {
        Ok(UserProfile {
            weight_kg: decimal_to_f64(self.weight_kg),
            height_cm: decimal_to_f64(self.height_cm),
            age: self.age,
            gender: self.gender.parse()?,
            activity_level: self.activity_level.parse()?,
            goal: self.goal.parse()?,
            target_weight_kg: decimal_to_f64(self.target_weight_kg),
        })
    }
}

pub struct UserRepository;

impl UserRepository {
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
        profile: &UserProfile,
    ) -> Result<UserRow> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (
                email, password_hash, name, weight_kg, height_cm, age,
                gender, activity_level, goal, target_weight_kg
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, email, password_hash, name, weight_kg, height_cm, age,
                      gender, activity_level, goal, target_weight_kg, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(to_decimal(profile.weight_kg)?)
        .bind(to_decimal(profile.height_cm)?)
        .bind(profile.age)
        .bind(profile.gender.as_str())
        .bind(profile.activity_level.as_str())
        .bind(profile.goal.as_str())
        .bind(to_decimal(profile.target_weight_kg)?)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, name, weight_kg, height_cm, age,
                   gender, activity_level, goal, target_weight_kg, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, name, weight_kg, height_cm, age,
                   gender, activity_level, goal, target_weight_kg, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }

    /// Replace the profile columns; `name` is kept when `None`
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        name: Option<&str>,
        profile: &UserProfile,
    ) -> Result<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                weight_kg = $3,
                height_cm = $4,
                age = $5,
                gender = $6,
                activity_level = $7,
                goal = $8,
                target_weight_kg = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, name, weight_kg, height_cm, age,
                      gender, activity_level, goal, target_weight_kg, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(to_decimal(profile.weight_kg)?)
        .bind(to_decimal(profile.height_cm)?)
        .bind(profile.age)
        .bind(profile.gender.as_str())
        .bind(profile.activity_level.as_str())
        .bind(profile.goal.as_str())
        .bind(to_decimal(profile.target_weight_kg)?)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
