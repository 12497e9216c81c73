use super::traits::{NewUserRecord, UserChanges, UserRepository};
use crate::types::{AppError, Result, Role, User, UserFilter, UserRole};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params::Params, Builder, Connection, Database, Row, Value};

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, active, created_at, updated_at";

/// libsql client for local SQLite files, in-memory databases and Turso.
///
/// A single connection is opened up front and cloned per operation, which
/// keeps every caller on the same database even for `:memory:`.
pub struct TursoClient {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

impl TursoClient {
    #[cfg(feature = "turso")]
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        Self::from_database(db).await
    }

    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        // Roles table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS roles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create roles table: {}", e)))?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                password_hash TEXT NOT NULL,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                role TEXT NOT NULL DEFAULT 'user' REFERENCES roles(name),
                active INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                deleted_at INTEGER
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_users_deleted_at ON users(deleted_at)",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users index: {}", e)))?;

        self.seed_roles().await
    }

    /// Inserts the built-in roles that are not present yet.
    async fn seed_roles(&self) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        for role in UserRole::ALL {
            conn.execute(
                "INSERT OR IGNORE INTO roles (name, created_at, updated_at) VALUES (?, ?, ?)",
                (role.as_str(), now, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to seed role {}: {}", role, e)))?;
        }

        Ok(())
    }

    async fn query_one_user(&self, sql: &str, params: Params) -> Result<Option<User>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for TursoClient {
    async fn insert_user(&self, record: &NewUserRecord) -> Result<User> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let mut rows = conn
            .query(
                "INSERT INTO users
                 (email, password_hash, first_name, last_name, role, active, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                 RETURNING id",
                Params::Positional(vec![
                    Value::Text(record.email.clone()),
                    Value::Text(record.password_hash.as_str().to_string()),
                    Value::Text(record.first_name.clone()),
                    Value::Text(record.last_name.clone()),
                    Value::Text(record.role.as_str().to_string()),
                    Value::Integer(record.active as i64),
                    Value::Integer(now),
                    Value::Integer(now),
                ]),
            )
            .await
            .map_err(|e| write_error("create user", "User with this email already exists", e))?;

        let row = rows
            .next()
            .await
            .map_err(|e| write_error("create user", "User with this email already exists", e))?
            .ok_or_else(|| AppError::Database("Insert returned no id".to_string()))?;
        let id: i64 = row.get(0).map_err(|e| AppError::Database(e.to_string()))?;

        Ok(User {
            id,
            email: record.email.clone(),
            password_hash: record.password_hash.as_str().to_string(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            role: record.role,
            active: record.active,
            created_at: timestamp(now)?,
            updated_at: timestamp(now)?,
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_one_user(
            &format!(
                "SELECT {} FROM users WHERE email = ? AND deleted_at IS NULL",
                USER_COLUMNS
            ),
            Params::Positional(vec![Value::Text(email.to_string())]),
        )
        .await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.query_one_user(
            &format!(
                "SELECT {} FROM users WHERE id = ? AND deleted_at IS NULL",
                USER_COLUMNS
            ),
            Params::Positional(vec![Value::Integer(id)]),
        )
        .await
    }

    async fn email_in_use(&self, email: &str, except_id: Option<i64>) -> Result<bool> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM users WHERE email = ? AND id != ?",
                Params::Positional(vec![
                    Value::Text(email.to_string()),
                    Value::Integer(except_id.unwrap_or(-1)),
                ]),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to check email: {}", e)))?;

        let count: i64 = match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            None => 0,
        };

        Ok(count > 0)
    }

    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<Option<User>> {
        let conn = self.connection()?;

        let mut sets = vec!["updated_at = ?"];
        let mut values = vec![Value::Integer(Utc::now().timestamp())];

        if let Some(ref email) = changes.email {
            sets.push("email = ?");
            values.push(Value::Text(email.clone()));
        }
        if let Some(ref hash) = changes.password_hash {
            sets.push("password_hash = ?");
            values.push(Value::Text(hash.as_str().to_string()));
        }
        if let Some(ref first_name) = changes.first_name {
            sets.push("first_name = ?");
            values.push(Value::Text(first_name.clone()));
        }
        if let Some(ref last_name) = changes.last_name {
            sets.push("last_name = ?");
            values.push(Value::Text(last_name.clone()));
        }
        if let Some(role) = changes.role {
            sets.push("role = ?");
            values.push(Value::Text(role.as_str().to_string()));
        }
        if let Some(active) = changes.active {
            sets.push("active = ?");
            values.push(Value::Integer(active as i64));
        }
        values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE users SET {} WHERE id = ? AND deleted_at IS NULL",
            sets.join(", ")
        );
        let affected = conn
            .execute(&sql, Params::Positional(values))
            .await
            .map_err(|e| write_error("update user", "Email already in use", e))?;

        if affected == 0 {
            return Ok(None);
        }

        self.get_user_by_id(id).await
    }

    async fn soft_delete_user(&self, id: i64) -> Result<bool> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let affected = conn
            .execute(
                "UPDATE users SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
                (now, now, id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;

        Ok(affected > 0)
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<(Vec<User>, i64)> {
        let conn = self.connection()?;

        let mut clauses = vec!["deleted_at IS NULL".to_string()];
        let mut values = Vec::new();

        if let Some(role) = filter.role {
            clauses.push("role = ?".to_string());
            values.push(Value::Text(role.as_str().to_string()));
        }
        if let Some(active) = filter.active {
            clauses.push("active = ?".to_string());
            values.push(Value::Integer(active as i64));
        }
        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", escape_like(search));
            clauses.push(
                "(email LIKE ? ESCAPE '\\' OR first_name LIKE ? ESCAPE '\\' OR last_name LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            values.push(Value::Text(pattern.clone()));
            values.push(Value::Text(pattern.clone()));
            values.push(Value::Text(pattern));
        }
        let where_clause = clauses.join(" AND ");

        let mut rows = conn
            .query(
                &format!("SELECT COUNT(*) FROM users WHERE {}", where_clause),
                Params::Positional(values.clone()),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to count users: {}", e)))?;
        let total: i64 = match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            None => 0,
        };

        values.push(Value::Integer(filter.limit as i64));
        values.push(Value::Integer(filter.offset() as i64));

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM users WHERE {}
                     ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
                    USER_COLUMNS, where_clause
                ),
                Params::Positional(values),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query users: {}", e)))?;

        let mut users = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            users.push(user_from_row(&row)?);
        }

        Ok((users, total))
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, name, created_at, updated_at FROM roles ORDER BY id ASC",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query roles: {}", e)))?;

        let mut roles = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            roles.push(role_from_row(&row)?);
        }

        Ok(roles)
    }

    async fn get_role(&self, id: i64) -> Result<Option<Role>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, name, created_at, updated_at FROM roles WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query role: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(role_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

/// Unique-constraint violations become `Conflict`; the constraint is the
/// authoritative duplicate-email guard.
fn write_error(action: &str, conflict: &str, e: libsql::Error) -> AppError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed") {
        AppError::Conflict(conflict.to_string())
    } else {
        AppError::Database(format!("Failed to {}: {}", action, message))
    }
}

/// Makes `%`, `_` and `\` match literally inside a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::Database(format!("Invalid timestamp: {}", secs)))
}

fn user_from_row(row: &Row) -> Result<User> {
    let role: String = row.get(5).map_err(|e| AppError::Database(e.to_string()))?;
    let active: i64 = row.get(6).map_err(|e| AppError::Database(e.to_string()))?;

    Ok(User {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        email: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        first_name: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        last_name: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
        role: role
            .parse()
            .map_err(|_| AppError::Database(format!("Unknown role in users table: {}", role)))?,
        active: active != 0,
        created_at: timestamp(row.get(7).map_err(|e| AppError::Database(e.to_string()))?)?,
        updated_at: timestamp(row.get(8).map_err(|e| AppError::Database(e.to_string()))?)?,
    })
}

fn role_from_row(row: &Row) -> Result<Role> {
    Ok(Role {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: timestamp(row.get(2).map_err(|e| AppError::Database(e.to_string()))?)?,
        updated_at: timestamp(row.get(3).map_err(|e| AppError::Database(e.to_string()))?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_marks_wildcards() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("under_score"), "under\\_score");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
