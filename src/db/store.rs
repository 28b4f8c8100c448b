use crate::types::{
    AppError, CitationEntry, FollowUpEntry, LogEntry, Result, RunDetail, RunStatus, RunSummary,
    SourceType, UserProfile,
};
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection};

/// Local SQLite store for users, runs, logs, citations, and follow-ups.
///
/// Holds a single shared connection. `:memory:` databases exist per
/// connection, so opening a new connection per call would silently split
/// the data; one `Connection` is cheap to clone and serves every method.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (and if needed creates) the database at `path`.
    pub async fn open(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let store = Self { conn };
        store.initialize_schema().await?;

        Ok(store)
    }

    /// Opens an ephemeral in-memory database.
    pub async fn open_memory() -> Result<Self> {
        Self::open(":memory:").await
    }

    async fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| AppError::Database(format!("Failed to enable foreign keys: {}", e)))?;

        // Users table
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    username TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL,
                    api_key TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Research runs table
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS research_runs (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    user_query TEXT NOT NULL,
                    status TEXT NOT NULL,
                    final_report TEXT,
                    error_message TEXT,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL,
                    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
                )",
                (),
            )
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to create research_runs table: {}", e))
            })?;

        // Agent logs table, append-only
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS agent_logs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    run_id TEXT NOT NULL,
                    action_type TEXT NOT NULL,
                    details TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    FOREIGN KEY (run_id) REFERENCES research_runs(id) ON DELETE CASCADE
                )",
                (),
            )
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to create agent_logs table: {}", e))
            })?;

        // Citations table
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS citations (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    run_id TEXT NOT NULL,
                    title TEXT NOT NULL,
                    url TEXT NOT NULL,
                    source_type TEXT NOT NULL,
                    FOREIGN KEY (run_id) REFERENCES research_runs(id) ON DELETE CASCADE
                )",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create citations table: {}", e)))?;

        // Follow-up messages table
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS follow_up_messages (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    run_id TEXT NOT NULL,
                    role TEXT NOT NULL,
                    content TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    FOREIGN KEY (run_id) REFERENCES research_runs(id) ON DELETE CASCADE
                )",
                (),
            )
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to create follow_up_messages table: {}", e))
            })?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_research_runs_user_id ON research_runs(user_id)",
            "CREATE INDEX IF NOT EXISTS idx_agent_logs_run_id ON agent_logs(run_id)",
            "CREATE INDEX IF NOT EXISTS idx_citations_run_id ON citations(run_id)",
            "CREATE INDEX IF NOT EXISTS idx_follow_up_messages_run_id ON follow_up_messages(run_id)",
        ] {
            self.conn
                .execute(statement, ())
                .await
                .map_err(|e| AppError::Database(format!("Failed to create index: {}", e)))?;
        }

        Ok(())
    }

    // User operations

    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        api_key: &str,
    ) -> Result<User> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().timestamp_millis();

        self.conn
            .execute(
                "INSERT INTO users (id, username, password_hash, api_key, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                (id.as_str(), username, password_hash, api_key, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            api_key: api_key.to_string(),
            created_at: now,
        })
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, username, password_hash, api_key, created_at
                 FROM users WHERE username = ?",
                [username],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, username, password_hash, api_key, created_at
                 FROM users WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_user_password(&self, user_id: &str, password_hash: &str) -> Result<()> {
        self.conn
            .execute(
                "UPDATE users SET password_hash = ? WHERE id = ?",
                (password_hash, user_id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update password: {}", e)))?;

        Ok(())
    }

    pub async fn update_user_api_key(&self, user_id: &str, api_key: &str) -> Result<()> {
        self.conn
            .execute(
                "UPDATE users SET api_key = ? WHERE id = ?",
                (api_key, user_id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update API key: {}", e)))?;

        Ok(())
    }

    fn user_from_row(row: &libsql::Row) -> Result<User> {
        Ok(User {
            id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            username: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            api_key: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
        })
    }

    // Run operations

    pub async fn create_run(&self, user_id: &str, user_query: &str) -> Result<ResearchRun> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().timestamp_millis();

        self.conn
            .execute(
                "INSERT INTO research_runs (id, user_id, user_query, status, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                (
                    id.as_str(),
                    user_id,
                    user_query,
                    RunStatus::Queued.as_str(),
                    now,
                    now,
                ),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create run: {}", e)))?;

        Ok(ResearchRun {
            id,
            user_id: user_id.to_string(),
            user_query: user_query.to_string(),
            status: RunStatus::Queued,
            final_report: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_run(&self, run_id: &str) -> Result<Option<ResearchRun>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, user_id, user_query, status, final_report, error_message,
                        created_at, updated_at
                 FROM research_runs WHERE id = ?",
                [run_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query run: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::run_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetches a run only when it belongs to `user_id`. The ownership
    /// filter lives in SQL so other tenants' runs look like they do not
    /// exist at all.
    pub async fn get_run_for_user(
        &self,
        run_id: &str,
        user_id: &str,
    ) -> Result<Option<ResearchRun>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, user_id, user_query, status, final_report, error_message,
                        created_at, updated_at
                 FROM research_runs WHERE id = ? AND user_id = ?",
                [run_id, user_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query run: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::run_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_runs_for_user(&self, user_id: &str) -> Result<Vec<ResearchRun>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, user_id, user_query, status, final_report, error_message,
                        created_at, updated_at
                 FROM research_runs WHERE user_id = ? ORDER BY created_at DESC",
                [user_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to list runs: {}", e)))?;

        let mut runs = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            runs.push(Self::run_from_row(&row)?);
        }

        Ok(runs)
    }

    pub async fn mark_run_in_progress(&self, run_id: &str) -> Result<()> {
        let now = Utc::now().timestamp_millis();

        self.conn
            .execute(
                "UPDATE research_runs SET status = ?, updated_at = ? WHERE id = ?",
                (RunStatus::InProgress.as_str(), now, run_id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update run status: {}", e)))?;

        Ok(())
    }

    /// Stores the final report and flips the run to `COMPLETED` in one
    /// statement, so readers never see a completed run without its report.
    pub async fn complete_run(&self, run_id: &str, final_report: &str) -> Result<()> {
        let now = Utc::now().timestamp_millis();

        self.conn
            .execute(
                "UPDATE research_runs
                 SET status = ?, final_report = ?, updated_at = ?
                 WHERE id = ?",
                (RunStatus::Completed.as_str(), final_report, now, run_id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to complete run: {}", e)))?;

        Ok(())
    }

    pub async fn fail_run(&self, run_id: &str, error_message: &str) -> Result<()> {
        let now = Utc::now().timestamp_millis();

        self.conn
            .execute(
                "UPDATE research_runs
                 SET status = ?, error_message = ?, updated_at = ?
                 WHERE id = ?",
                (RunStatus::Failed.as_str(), error_message, now, run_id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to mark run failed: {}", e)))?;

        Ok(())
    }

    fn run_from_row(row: &libsql::Row) -> Result<ResearchRun> {
        let status: String = row.get(3).map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ResearchRun {
            id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            user_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            user_query: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            status: RunStatus::parse(&status)
                .ok_or_else(|| AppError::Database(format!("Unknown run status: {}", status)))?,
            final_report: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            error_message: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: row.get(6).map_err(|e| AppError::Database(e.to_string()))?,
            updated_at: row.get(7).map_err(|e| AppError::Database(e.to_string()))?,
        })
    }

    // Log operations

    pub async fn append_log(&self, run_id: &str, action_type: &str, details: &str) -> Result<i64> {
        let now = Utc::now().timestamp_millis();

        let mut rows = self
            .conn
            .query(
                "INSERT INTO agent_logs (run_id, action_type, details, created_at)
                 VALUES (?, ?, ?, ?) RETURNING id",
                (run_id, action_type, details, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to append log: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => row.get(0).map_err(|e| AppError::Database(e.to_string())),
            None => Err(AppError::Database(
                "Log insert returned no id".to_string(),
            )),
        }
    }

    /// Log rows in insertion order. The id tiebreak keeps events written
    /// within the same millisecond in append order.
    pub async fn list_logs(&self, run_id: &str) -> Result<Vec<AgentLog>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, run_id, action_type, details, created_at
                 FROM agent_logs WHERE run_id = ? ORDER BY created_at ASC, id ASC",
                [run_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to list logs: {}", e)))?;

        let mut logs = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            logs.push(AgentLog {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                run_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                action_type: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                details: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
                created_at: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            });
        }

        Ok(logs)
    }

    // Citation operations

    pub async fn add_citation(
        &self,
        run_id: &str,
        title: &str,
        url: &str,
        source_type: SourceType,
    ) -> Result<i64> {
        let mut rows = self
            .conn
            .query(
                "INSERT INTO citations (run_id, title, url, source_type)
                 VALUES (?, ?, ?, ?) RETURNING id",
                (run_id, title, url, source_type.as_str()),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to add citation: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => row.get(0).map_err(|e| AppError::Database(e.to_string())),
            None => Err(AppError::Database(
                "Citation insert returned no id".to_string(),
            )),
        }
    }

    pub async fn list_citations(&self, run_id: &str) -> Result<Vec<Citation>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, run_id, title, url, source_type
                 FROM citations WHERE run_id = ? ORDER BY id ASC",
                [run_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to list citations: {}", e)))?;

        let mut citations = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            let source_type: String = row.get(4).map_err(|e| AppError::Database(e.to_string()))?;
            citations.push(Citation {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                run_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                title: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                url: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
                source_type: SourceType::parse(&source_type).ok_or_else(|| {
                    AppError::Database(format!("Unknown source type: {}", source_type))
                })?,
            });
        }

        Ok(citations)
    }

    // Follow-up operations

    pub async fn add_follow_up(
        &self,
        run_id: &str,
        role: &str,
        content: &str,
    ) -> Result<FollowUpMessage> {
        let now = Utc::now().timestamp_millis();

        let mut rows = self
            .conn
            .query(
                "INSERT INTO follow_up_messages (run_id, role, content, created_at)
                 VALUES (?, ?, ?, ?) RETURNING id",
                (run_id, role, content, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to add follow-up message: {}", e)))?;

        let id = match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            None => {
                return Err(AppError::Database(
                    "Follow-up insert returned no id".to_string(),
                ))
            }
        };

        Ok(FollowUpMessage {
            id,
            run_id: run_id.to_string(),
            role: role.to_string(),
            content: content.to_string(),
            created_at: now,
        })
    }

    pub async fn list_follow_ups(&self, run_id: &str) -> Result<Vec<FollowUpMessage>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, run_id, role, content, created_at
                 FROM follow_up_messages WHERE run_id = ? ORDER BY created_at ASC, id ASC",
                [run_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to list follow-ups: {}", e)))?;

        let mut messages = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            messages.push(FollowUpMessage {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                run_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                role: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                content: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
                created_at: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            });
        }

        Ok(messages)
    }
}

fn datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

// Row types

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub api_key: String,
    pub created_at: i64,
}

impl User {
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            created_at: datetime(self.created_at),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResearchRun {
    pub id: String,
    pub user_id: String,
    pub user_query: String,
    pub status: RunStatus,
    pub final_report: Option<String>,
    pub error_message: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ResearchRun {
    pub fn to_summary(&self) -> RunSummary {
        RunSummary {
            id: self.id.clone(),
            user_query: self.user_query.clone(),
            status: self.status,
            created_at: datetime(self.created_at),
            updated_at: datetime(self.updated_at),
        }
    }

    pub fn to_detail(&self, citations: Vec<CitationEntry>) -> RunDetail {
        RunDetail {
            id: self.id.clone(),
            user_query: self.user_query.clone(),
            status: self.status,
            final_report: self.final_report.clone(),
            error_message: self.error_message.clone(),
            created_at: datetime(self.created_at),
            updated_at: datetime(self.updated_at),
            citations,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentLog {
    pub id: i64,
    pub run_id: String,
    pub action_type: String,
    /// Serialized event exactly as it was emitted.
    pub details: String,
    pub created_at: i64,
}

impl AgentLog {
    pub fn to_entry(&self) -> LogEntry {
        LogEntry {
            id: self.id,
            run_id: self.run_id.clone(),
            action_type: self.action_type.clone(),
            details: serde_json::from_str(&self.details)
                .unwrap_or_else(|_| serde_json::Value::String(self.details.clone())),
            created_at: datetime(self.created_at),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Citation {
    pub id: i64,
    pub run_id: String,
    pub title: String,
    pub url: String,
    pub source_type: SourceType,
}

impl Citation {
    pub fn to_entry(&self) -> CitationEntry {
        CitationEntry {
            id: self.id,
            run_id: self.run_id.clone(),
            title: self.title.clone(),
            url: self.url.clone(),
            source_type: self.source_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FollowUpMessage {
    pub id: i64,
    pub run_id: String,
    pub role: String,
    pub content: String,
    pub created_at: i64,
}

impl FollowUpMessage {
    pub fn to_entry(&self) -> FollowUpEntry {
        FollowUpEntry {
            id: self.id,
            run_id: self.run_id.clone(),
            role: self.role.clone(),
            content: self.content.clone(),
            created_at: datetime(self.created_at),
        }
    }
}
