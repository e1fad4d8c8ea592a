// src/database.rs
use crate::types::{Application, NewOpportunity, Opportunity, Profile};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub role: String,
    /// Base64-encoded avatar, already compressed by the upload gate.
    pub user_img: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub const ROLE_CANDIDATE: &'static str = "candidate";
    pub const ROLE_RECRUITER: &'static str = "recruiter";
    pub const ROLE_ADMIN: &'static str = "admin";

    pub fn is_known_role(role: &str) -> bool {
        matches!(
            role,
            Self::ROLE_CANDIDATE | Self::ROLE_RECRUITER | Self::ROLE_ADMIN
        )
    }

    pub fn can_review_applications(&self) -> bool {
        self.role == Self::ROLE_RECRUITER || self.role == Self::ROLE_ADMIN
    }
}

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());
        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Database pool not initialized. Call init_pool() first."))
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        let pool = self.pool()?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'candidate',
                user_img TEXT,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_email TEXT NOT NULL UNIQUE,
                summary TEXT,
                skills TEXT NOT NULL DEFAULT '[]',
                experiences TEXT NOT NULL DEFAULT '[]',
                educations TEXT NOT NULL DEFAULT '[]',
                linkedin_url TEXT,
                cv_file TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS opportunities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                department TEXT,
                location TEXT,
                description TEXT,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS applications (
                id TEXT PRIMARY KEY,
                candidate_email TEXT NOT NULL,
                opportunity_id INTEGER NOT NULL,
                application_status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(candidate_email, opportunity_id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_users_email
            ON users(email);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_applications_candidate
            ON applications(candidate_email);
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, display_name, role, user_img, is_active, created_at, updated_at
            FROM users
            WHERE email = ? AND is_active = TRUE
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a new user
    pub async fn create(&self, email: &str, display_name: &str, role: &str) -> Result<User> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, display_name, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, TRUE, ?, ?)
            "#,
        )
        .bind(email)
        .bind(display_name)
        .bind(role)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        let user = User {
            id: result.last_insert_rowid(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            role: role.to_string(),
            user_img: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        info!("Created user: {} ({})", email, role);
        Ok(user)
    }

    /// List all active users
    pub async fn list_active(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, display_name, role, user_img, is_active, created_at, updated_at
            FROM users
            WHERE is_active = TRUE
            ORDER BY email ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Deactivate a user
    pub async fn deactivate(&self, email: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_active = FALSE, updated_at = ?
            WHERE email = ?
            "#,
        )
        .bind(Utc::now())
        .bind(email)
        .execute(self.pool)
        .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Deactivated user: {}", email);
        }

        Ok(updated)
    }

    /// Store the compressed avatar payload
    pub async fn set_avatar(&self, email: &str, user_img: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET user_img = ?, updated_at = ?
            WHERE email = ? AND is_active = TRUE
            "#,
        )
        .bind(user_img)
        .bind(Utc::now())
        .bind(email)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// User-level operations built on the repository
pub struct UserService<'a> {
    repo: UserRepository<'a>,
}

impl<'a> UserService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            repo: UserRepository::new(pool),
        }
    }

    /// Look up a user, creating a candidate record on first sight.
    pub async fn get_or_create(&self, email: &str, display_name: &str) -> Result<User> {
        if let Some(user) = self.repo.find_by_email(email).await? {
            return Ok(user);
        }
        self.repo
            .create(email, display_name, User::ROLE_CANDIDATE)
            .await
    }

    /// Validate user access
    pub async fn validate_user_access(&self, email: &str) -> Result<Option<User>> {
        match self.repo.find_by_email(email).await? {
            Some(user) => {
                info!("User {} validated (role: {})", email, user.role);
                Ok(Some(user))
            }
            None => {
                info!("Access denied for email: {} - no active user", email);
                Ok(None)
            }
        }
    }
}

// Profile list sections live in JSON text columns; this row type is the
// storage shape, converted to the domain `Profile` at the boundary.
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    summary: Option<String>,
    skills: String,
    experiences: String,
    educations: String,
    linkedin_url: Option<String>,
    cv_file: Option<String>,
}

impl ProfileRow {
    fn into_profile(self) -> Result<Profile> {
        Ok(Profile {
            summary: self.summary,
            skills: serde_json::from_str(&self.skills).context("Corrupt skills column")?,
            experiences: serde_json::from_str(&self.experiences)
                .context("Corrupt experiences column")?,
            educations: serde_json::from_str(&self.educations)
                .context("Corrupt educations column")?,
            linkedin_url: self.linkedin_url,
            cv_file: self.cv_file,
        })
    }
}

pub struct ProfileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a candidate's profile; `None` means the profile was never created.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT summary, skills, experiences, educations, linkedin_url, cv_file
            FROM profiles
            WHERE user_email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProfileRow::into_profile).transpose()
    }

    /// Create or update the editable profile sections. The CV payload is
    /// managed separately by `set_cv` and survives profile edits.
    pub async fn upsert(&self, email: &str, profile: &Profile) -> Result<()> {
        let now = Utc::now();
        let skills = serde_json::to_string(&profile.skills)?;
        let experiences = serde_json::to_string(&profile.experiences)?;
        let educations = serde_json::to_string(&profile.educations)?;

        sqlx::query(
            r#"
            INSERT INTO profiles
                (user_email, summary, skills, experiences, educations, linkedin_url,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_email) DO UPDATE SET
                summary = excluded.summary,
                skills = excluded.skills,
                experiences = excluded.experiences,
                educations = excluded.educations,
                linkedin_url = excluded.linkedin_url,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(email)
        .bind(&profile.summary)
        .bind(skills)
        .bind(experiences)
        .bind(educations)
        .bind(&profile.linkedin_url)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!("Saved profile for {}", email);
        Ok(())
    }

    /// Attach an encoded CV document to an existing profile.
    pub async fn set_cv(&self, email: &str, cv_file: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET cv_file = ?, updated_at = ?
            WHERE user_email = ?
            "#,
        )
        .bind(cv_file)
        .bind(Utc::now())
        .bind(email)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct OpportunityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OpportunityRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List open opportunities
    pub async fn list_active(&self) -> Result<Vec<Opportunity>> {
        let opportunities = sqlx::query_as::<_, Opportunity>(
            r#"
            SELECT id, title, company, department, location, description, is_active, created_at
            FROM opportunities
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(opportunities)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Opportunity>> {
        let opportunity = sqlx::query_as::<_, Opportunity>(
            r#"
            SELECT id, title, company, department, location, description, is_active, created_at
            FROM opportunities
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(opportunity)
    }

    pub async fn create(&self, new: &NewOpportunity) -> Result<Opportunity> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO opportunities
                (title, company, department, location, description, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, TRUE, ?)
            "#,
        )
        .bind(&new.title)
        .bind(&new.company)
        .bind(&new.department)
        .bind(&new.location)
        .bind(&new.description)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(Opportunity {
            id: result.last_insert_rowid(),
            title: new.title.clone(),
            company: new.company.clone(),
            department: new.department.clone(),
            location: new.location.clone(),
            description: new.description.clone(),
            is_active: true,
            created_at: now,
        })
    }
}

pub struct ApplicationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ApplicationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_candidate(&self, email: &str) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, candidate_email, opportunity_id, application_status,
                   created_at, updated_at
            FROM applications
            WHERE candidate_email = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(self.pool)
        .await?;

        Ok(applications)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, candidate_email, opportunity_id, application_status,
                   created_at, updated_at
            FROM applications
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(application)
    }

    pub async fn exists_for(&self, email: &str, opportunity_id: i64) -> Result<bool> {
        let existing = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM applications
            WHERE candidate_email = ? AND opportunity_id = ?
            "#,
        )
        .bind(email)
        .bind(opportunity_id)
        .fetch_one(self.pool)
        .await?;

        Ok(existing > 0)
    }

    /// Submit a new application, starting in `pending`.
    pub async fn create(&self, email: &str, opportunity_id: i64) -> Result<Application> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO applications
                (id, candidate_email, opportunity_id, application_status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(email)
        .bind(opportunity_id)
        .bind(Application::STATUS_PENDING)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!("Application {} submitted by {}", id, email);

        Ok(Application {
            id,
            candidate_email: email.to_string(),
            opportunity_id,
            application_status: Application::STATUS_PENDING.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Move an application to a new status; the caller validates the value.
    pub async fn set_status(&self, id: &str, status: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE applications
            SET application_status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
