//! Init command implementation
//!
//! Scaffolds a Warden deployment directory: `warden.toml`, `.env.example`,
//! `.gitignore` and the `data/` directory for the SQLite file.

use super::output::Output;
use std::fs;
use std::path::Path;

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (warden.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: std::path::PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Warden");

    let base_path = &config.path;

    let config_path = base_path.join("warden.toml");
    if config_path.exists() && !config.force {
        output.warning("warden.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let data_dir = base_path.join("data");
    if data_dir.exists() {
        output.skipped("data", "already exists");
    } else {
        if let Err(e) = fs::create_dir_all(&data_dir) {
            output.error(&format!("Failed to create data: {}", e));
            return InitResult::Error(e.to_string());
        }
        output.created("directory", "data");
    }

    let files = [
        ("config", "warden.toml", generate_warden_toml(&config), config.force),
        ("env", ".env.example", generate_env_example(), config.force),
        ("file", ".gitignore", generate_gitignore(), false),
    ];

    for (kind, name, content, force) in files {
        let path = base_path.join(name);
        if path.exists() && !force {
            output.skipped(name, "already exists");
            continue;
        }
        if let Err(e) = write_file(&path, &content, force) {
            output.error(&format!("Failed to create {}: {}", name, e));
            return InitResult::Error(e.to_string());
        }
        output.created(kind, name);
    }

    output.complete("Warden initialized successfully!");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set up environment variables:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set JWT_SECRET (min 32 bytes)");
    output.newline();
    output.info("2. Create the first administrator:");
    output.command("warden-server create-admin --email admin@example.com --password <password>");
    output.newline();
    output.info("3. Start the server:");
    output.command("warden-server");

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(()); // Skip existing files unless force is true
    }
    fs::write(path, content)
}

fn generate_warden_toml(config: &InitConfig) -> String {
    format!(
        r#"# Warden configuration
# Secrets are never stored here; each *_env key names an environment variable.

[server]
host = "{host}"
port = {port}
log_level = "info"
# "pretty" or "json"
log_format = "pretty"
# Browser origins allowed to send the session cookie cross-site.
cors_origins = []

[auth]
jwt_secret_env = "JWT_SECRET"
# Set to true when served over HTTPS.
cookie_secure = false

[database]
# Path to the SQLite file, or ":memory:" for an ephemeral store.
url = "./data/warden.db"
# turso_url_env = "TURSO_URL"
# turso_token_env = "TURSO_AUTH_TOKEN"
"#,
        host = config.host,
        port = config.port
    )
}

fn generate_env_example() -> String {
    r#"# Warden Environment Variables
# ============================
# Copy this file to .env and fill in the values.

# REQUIRED: JWT signing secret (minimum 32 bytes)
# Generate with: openssl rand -base64 32
JWT_SECRET=change-me-in-production-use-at-least-32-characters

# Optional: Logging level (trace, debug, info, warn, error)
RUST_LOG=info,warden=debug

# Optional: Turso cloud database (requires the `turso` feature)
# TURSO_URL=libsql://your-db.turso.io
# TURSO_AUTH_TOKEN=your-token
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"# Warden Generated Files
/data/
*.db
*.db-journal

# Environment
.env
.env.local
.env.*.local

# Rust
/target/
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::WardenConfig;
    use tempfile::TempDir;

    fn create_test_config(temp_dir: &TempDir, force: bool) -> InitConfig {
        InitConfig {
            path: temp_dir.path().to_path_buf(),
            force,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }

    #[test]
    fn test_generated_toml_parses() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let content = generate_warden_toml(&InitConfig {
            port: 4100,
            ..create_test_config(&temp_dir, false)
        });

        let parsed: WardenConfig = content.parse().expect("generated config should parse");
        assert_eq!(parsed.server.port, 4100);
        assert_eq!(parsed.auth.jwt_secret_env, "JWT_SECRET");
    }

    #[test]
    fn test_generate_env_example() {
        let content = generate_env_example();
        assert!(content.contains("JWT_SECRET="));
        assert!(!content.contains("API_KEY"));
    }

    #[test]
    fn test_write_file_skips_existing_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");

        fs::write(&file_path, "original").expect("Failed to write");

        write_file(&file_path, "new content", false).expect("should not fail");

        let content = fs::read_to_string(&file_path).expect("Failed to read file");
        assert_eq!(content, "original");
    }

    #[test]
    fn test_run_creates_all_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output = Output::no_color();

        let result = run(create_test_config(&temp_dir, false), &output);

        assert!(matches!(result, InitResult::Success));
        assert!(temp_dir.path().join("warden.toml").exists());
        assert!(temp_dir.path().join(".env.example").exists());
        assert!(temp_dir.path().join(".gitignore").exists());
        assert!(temp_dir.path().join("data").is_dir());
    }

    #[test]
    fn test_run_already_exists_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("warden.toml"), "existing").expect("Failed to write");

        let result = run(create_test_config(&temp_dir, false), &Output::no_color());

        assert!(matches!(result, InitResult::AlreadyExists));
    }

    #[test]
    fn test_run_force_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("warden.toml"), "existing").expect("Failed to write");

        let result = run(create_test_config(&temp_dir, true), &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        let content =
            fs::read_to_string(temp_dir.path().join("warden.toml")).expect("Failed to read");
        assert!(content.contains("[server]"));
        assert!(!content.contains("existing"));
    }
}
