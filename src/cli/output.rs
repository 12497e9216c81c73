//! Terminal output for the Warden CLI.
//!
//! Every line is rendered to a `String` first so the plain (`--no-color`)
//! form can be asserted on in tests; the print helpers only pick stdout or
//! stderr.

use owo_colors::OwoColorize;

/// Marker shown in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Info,
    Warn,
    Error,
    Created,
    Skipped,
}

impl Status {
    fn tag(self) -> &'static str {
        match self {
            Status::Ok => "[OK]",
            Status::Info => "[INFO]",
            Status::Warn => "[WARN]",
            Status::Error => "[ERROR]",
            Status::Created => "[CREATED]",
            Status::Skipped => "[SKIPPED]",
        }
    }

    fn glyph(self) -> String {
        match self {
            Status::Ok | Status::Created => "✓".green().bold().to_string(),
            Status::Info => "•".blue().to_string(),
            Status::Warn => "⚠".yellow().bold().to_string(),
            Status::Error => "✗".red().bold().to_string(),
            Status::Skipped => "○".yellow().to_string(),
        }
    }

    fn paint(self, text: &str) -> String {
        match self {
            Status::Ok => text.green().to_string(),
            Status::Warn => text.yellow().to_string(),
            Status::Error => text.red().to_string(),
            Status::Info | Status::Created | Status::Skipped => text.to_string(),
        }
    }
}

/// CLI printer; `colored: false` emits bracketed tags instead of glyphs.
pub struct Output {
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    fn status_line(&self, status: Status, message: &str) -> String {
        if self.colored {
            format!("  {} {}", status.glyph(), status.paint(message))
        } else {
            format!("  {} {}", status.tag(), message)
        }
    }

    fn render_banner(&self) -> String {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let tagline = "credentials, sessions and user administration";
        if self.colored {
            format!(
                "\n   {} {}\n   {}\n",
                "warden".bright_cyan().bold(),
                version.dimmed(),
                tagline.bright_white()
            )
        } else {
            format!("\n   warden {}\n   {}\n", version, tagline)
        }
    }

    fn render_header(&self, title: &str) -> String {
        if self.colored {
            format!("\n  {}", title.bright_white().bold().underline())
        } else {
            format!("\n  === {} ===", title)
        }
    }

    fn render_kv(&self, key: &str, value: &str) -> String {
        if self.colored {
            format!("    {}: {}", key.dimmed(), value.bright_white())
        } else {
            format!("    {}: {}", key, value)
        }
    }

    fn render_file(&self, status: Status, path: &str, detail: &str) -> String {
        if self.colored {
            format!("  {} {} {}", status.glyph(), detail.dimmed(), path.bright_white())
        } else {
            format!("  {} {} {}", status.tag(), detail, path)
        }
    }

    pub fn banner(&self) {
        println!("{}", self.render_banner());
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.status_line(Status::Ok, message));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.status_line(Status::Info, message));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.status_line(Status::Warn, message));
    }

    /// Errors go to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.status_line(Status::Error, message));
    }

    /// A file or directory written by `init`.
    pub fn created(&self, kind: &str, path: &str) {
        println!("{}", self.render_file(Status::Created, path, kind));
    }

    /// A file or directory `init` left alone.
    pub fn skipped(&self, path: &str, reason: &str) {
        println!(
            "{}",
            self.render_file(Status::Skipped, path, &format!("({})", reason))
        );
    }

    pub fn header(&self, title: &str) {
        println!("{}", self.render_header(title));
    }

    pub fn kv(&self, key: &str, value: &str) {
        println!("{}", self.render_kv(key, value));
    }

    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Shell command suggestion, prefixed with `$`.
    pub fn command(&self, cmd: &str) {
        let line = format!("$ {}", cmd);
        if self.colored {
            println!("     {}", line.bright_cyan());
        } else {
            println!("     {}", line);
        }
    }

    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    pub fn newline(&self) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Status::Ok, "  [OK] saved")]
    #[case(Status::Info, "  [INFO] saved")]
    #[case(Status::Warn, "  [WARN] saved")]
    #[case(Status::Error, "  [ERROR] saved")]
    fn test_plain_status_lines(#[case] status: Status, #[case] expected: &str) {
        assert_eq!(Output::no_color().status_line(status, "saved"), expected);
    }

    #[test]
    fn test_plain_file_lines_put_detail_before_path() {
        let output = Output::no_color();

        assert_eq!(
            output.render_file(Status::Created, "warden.toml", "config"),
            "  [CREATED] config warden.toml"
        );
        assert_eq!(
            output.render_file(Status::Skipped, "data", "(already exists)"),
            "  [SKIPPED] (already exists) data"
        );
    }

    #[test]
    fn test_plain_header_kv_and_banner() {
        let output = Output::no_color();

        assert_eq!(output.render_header("Configuration"), "\n  === Configuration ===");
        assert_eq!(output.render_kv("port", "3000"), "    port: 3000");
        assert!(output
            .render_banner()
            .contains(&format!("warden v{}", env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn test_colored_lines_keep_the_message() {
        let line = Output::new().status_line(Status::Warn, "careful");

        assert!(line.contains("careful"));
        assert!(!line.contains("[WARN]"));
    }
}
