//! Line-oriented parser and binder
//!
//! One synchronous pass over the file content: each line is classified as
//! blank, comment, section header, or assignment, and assignments are bound
//! through the schema into the caller's record. The first fatal error
//! aborts the pass; the record keeps whatever was written before it.

use std::path::{Path, PathBuf};

use crate::error::{LoadError, LoadResult};
use crate::schema::{BindOutcome, Schema, SectionBinding};

/// File loader for sectioned key/value configuration
///
/// Carries the ambient options of a load; the parse itself is in
/// [`Loader::load_str`].
#[derive(Debug, Clone)]
pub struct Loader {
    /// Base directory for relative paths
    base_dir: Option<PathBuf>,
    /// Whether a missing file yields success and an untouched record
    allow_missing: bool,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            base_dir: None,
            allow_missing: false,
        }
    }

    /// Create a new loader resolving relative paths against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            allow_missing: false,
        }
    }

    /// Set whether to allow missing files
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_missing(mut self, allow: bool) -> Self {
        self.allow_missing = allow;
        self
    }

    /// Resolve path relative to base directory
    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base_dir) if path.is_relative() => base_dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Read the file at `path` in full and bind its contents into `target`
    ///
    /// The record is written in place and may be partially populated when an
    /// error is returned; nothing is rolled back.
    pub fn load<T>(
        &self,
        path: impl AsRef<Path>,
        schema: &Schema<T>,
        target: &mut T,
    ) -> LoadResult<()> {
        let path = self.resolve_path(path.as_ref());

        if self.allow_missing && !path.exists() {
            stanza_log::debug!(
                "configuration file not found, leaving record untouched: {}",
                path.display()
            );
            return Ok(());
        }

        stanza_log::debug!("loading configuration from {}", path.display());
        let content =
            std::fs::read_to_string(&path).map_err(|e| LoadError::io(&path, e.to_string()))?;

        bind_str(&content, schema, target)?;
        stanza_log::debug!("loaded configuration from {}", path.display());
        Ok(())
    }

    /// Bind pre-read file content into `target`
    pub fn load_str<T>(&self, content: &str, schema: &Schema<T>, target: &mut T) -> LoadResult<()> {
        bind_str(content, schema, target)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the file at `path` into `target` with a default [`Loader`]
pub fn load<T>(path: impl AsRef<Path>, schema: &Schema<T>, target: &mut T) -> LoadResult<()> {
    Loader::new().load(path, schema, target)
}

/// Bind pre-read file content into `target` with a default [`Loader`]
pub fn load_str<T>(content: &str, schema: &Schema<T>, target: &mut T) -> LoadResult<()> {
    Loader::new().load_str(content, schema, target)
}

/// The parse cursor's notion of which section is active
enum Active<'s, T> {
    /// No section header has been seen yet
    Unset,
    /// The last header named a section the schema does not declare;
    /// assignments are dropped until the next recognized header
    Unrecognized,
    /// Assignments bind into this section
    Bound(&'s dyn SectionBinding<T>),
}

/// One pass over the ordered line sequence
///
/// Lines are delimited by the two-character CR-LF sequence, per the file
/// format. Line numbers in errors are 1-based.
fn bind_str<T>(content: &str, schema: &Schema<T>, target: &mut T) -> LoadResult<()> {
    let mut active = Active::Unset;

    for (idx, raw_line) in content.split("\r\n").enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if line.is_empty() {
            continue;
        }
        if line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(inner) = rest.strip_suffix(']') else {
                return Err(LoadError::syntax(
                    line_no,
                    "section header is missing the closing `]`",
                ));
            };
            let name = inner.trim();
            if name.is_empty() {
                return Err(LoadError::syntax(line_no, "section header has an empty name"));
            }
            active = match schema.resolve_section(name) {
                Some(section) => Active::Bound(section),
                None => Active::Unrecognized,
            };
            continue;
        }

        // Anything else must be `key = value` on the first `=`.
        let Some(eq) = line.find('=') else {
            return Err(LoadError::syntax(line_no, "expected `key = value`"));
        };
        if eq == 0 {
            return Err(LoadError::syntax(line_no, "assignment is missing a key"));
        }
        let key = line[..eq].trim();
        let raw_value = line[eq + 1..].trim();

        match &active {
            Active::Unset => {
                return Err(LoadError::syntax(
                    line_no,
                    "assignment appears before any section header",
                ));
            }
            Active::Unrecognized => {}
            Active::Bound(section) => match section.bind(target, key, raw_value) {
                BindOutcome::Written | BindOutcome::UnknownKey => {}
                BindOutcome::Mismatch(expected) => {
                    return Err(LoadError::value(line_no, key, expected, raw_value));
                }
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValueKind;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct MysqlConfig {
        address: String,
        port: i64,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct RedisConfig {
        host: String,
        port: i64,
        database: i64,
        test: bool,
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct AppConfig {
        mysql: MysqlConfig,
        redis: RedisConfig,
    }

    fn app_schema() -> Schema<AppConfig> {
        Schema::<AppConfig>::builder()
            .section("mysql", |c: &mut AppConfig| &mut c.mysql, |s| {
                s.text("address", |m: &mut MysqlConfig, v| m.address = v)
                    .integer("port", |m, v| m.port = v)
            })
            .section("redis", |c: &mut AppConfig| &mut c.redis, |s| {
                s.text("host", |r: &mut RedisConfig, v| r.host = v)
                    .integer("port", |r, v| r.port = v)
                    .integer("database", |r, v| r.database = v)
                    .boolean("test", |r, v| r.test = v)
            })
            .build()
            .unwrap()
    }

    const WELL_FORMED: &str = "[mysql]\r\naddress = 127.0.0.1\r\nport = 3306\r\n[redis]\r\nhost = 127.0.0.1\r\nport = 6379\r\ndatabase = 0\r\ntest = true\r\n";

    #[test]
    fn populates_every_declared_field() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        load_str(WELL_FORMED, &schema, &mut config).unwrap();

        assert_eq!(
            config,
            AppConfig {
                mysql: MysqlConfig {
                    address: "127.0.0.1".to_string(),
                    port: 3306,
                },
                redis: RedisConfig {
                    host: "127.0.0.1".to_string(),
                    port: 6379,
                    database: 0,
                    test: true,
                },
            }
        );
    }

    #[test]
    fn loads_are_deterministic() {
        let schema = app_schema();
        let mut first = AppConfig::default();
        let mut second = AppConfig::default();
        load_str(WELL_FORMED, &schema, &mut first).unwrap();
        load_str(WELL_FORMED, &schema, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        let content = "; generated\r\n# local overrides\r\n\r\n[mysql]\r\n  address =  10.0.0.1  \r\n";
        load_str(content, &schema, &mut config).unwrap();
        assert_eq!(config.mysql.address, "10.0.0.1");
    }

    #[test]
    fn value_whitespace_is_trimmed_on_both_sides() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        load_str("[mysql]\r\n  port   =   -3306  \r\n", &schema, &mut config).unwrap();
        assert_eq!(config.mysql.port, -3306);
    }

    #[test]
    fn later_assignment_overwrites_earlier() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        load_str("[mysql]\r\nport = 1\r\nport = 2\r\n", &schema, &mut config).unwrap();
        assert_eq!(config.mysql.port, 2);
    }

    #[test]
    fn missing_delimiter_is_a_syntax_error() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        let err = load_str("[mysql]\r\njust words\r\n", &schema, &mut config).unwrap_err();
        assert_eq!(err, LoadError::syntax(2, "expected `key = value`"));
    }

    #[test]
    fn leading_delimiter_is_a_syntax_error() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        let err = load_str("[mysql]\r\n= oops\r\n", &schema, &mut config).unwrap_err();
        assert_eq!(err, LoadError::syntax(2, "assignment is missing a key"));
    }

    #[test]
    fn unterminated_header_is_a_syntax_error() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        let err = load_str("[mysql\r\naddress = x\r\n", &schema, &mut config).unwrap_err();
        assert_eq!(
            err,
            LoadError::syntax(1, "section header is missing the closing `]`")
        );
    }

    #[test]
    fn empty_header_name_is_a_syntax_error() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        let err = load_str("[   ]\r\n", &schema, &mut config).unwrap_err();
        assert_eq!(err, LoadError::syntax(1, "section header has an empty name"));
    }

    #[test]
    fn assignment_before_any_header_is_a_syntax_error() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        let err = load_str("address = 1.2.3.4\r\n[mysql]\r\n", &schema, &mut config).unwrap_err();
        assert_eq!(
            err,
            LoadError::syntax(1, "assignment appears before any section header")
        );
    }

    #[test]
    fn coercion_failure_keeps_earlier_fields() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        let content = "[mysql]\r\naddress = 127.0.0.1\r\nport = threethousand\r\n";
        let err = load_str(content, &schema, &mut config).unwrap_err();

        assert_eq!(
            err,
            LoadError::value(3, "port", ValueKind::Integer, "threethousand")
        );
        // The pass aborted mid-file; line 2 already landed.
        assert_eq!(config.mysql.address, "127.0.0.1");
        assert_eq!(config.mysql.port, 0);
    }

    #[test]
    fn boolean_coercion_failure_carries_the_line() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        let err = load_str("[redis]\r\ntest = maybe\r\n", &schema, &mut config).unwrap_err();
        assert_eq!(err, LoadError::value(2, "test", ValueKind::Boolean, "maybe"));
    }

    #[test]
    fn unknown_key_is_ignored() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        load_str(
            "[mysql]\r\ncharset = utf8\r\naddress = db1\r\n",
            &schema,
            &mut config,
        )
        .unwrap();
        assert_eq!(config.mysql.address, "db1");
    }

    #[test]
    fn unknown_section_drops_its_assignments() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        let content = "[mysql]\r\naddress = db1\r\n[cache]\r\nport = 9\r\n[redis]\r\nport = 7\r\n";
        load_str(content, &schema, &mut config).unwrap();

        // `port = 9` under the unrecognized header binds nowhere, and the
        // later recognized header re-binds.
        assert_eq!(config.mysql.address, "db1");
        assert_eq!(config.mysql.port, 0);
        assert_eq!(config.redis.port, 7);
    }

    #[test]
    fn lines_are_delimited_by_crlf_only() {
        let schema = app_schema();
        let mut config = AppConfig::default();
        // LF-only input is one long line to this format.
        let err = load_str("[mysql]\naddress = x", &schema, &mut config).unwrap_err();
        assert_eq!(
            err,
            LoadError::syntax(1, "section header is missing the closing `]`")
        );
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.ini");
        std::fs::write(&path, WELL_FORMED).unwrap();

        let schema = app_schema();
        let mut config = AppConfig::default();
        load(&path, &schema, &mut config).unwrap();
        assert_eq!(config.redis.port, 6379);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ini");

        let schema = app_schema();
        let mut config = AppConfig::default();
        let err = load(&path, &schema, &mut config).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn allow_missing_leaves_the_record_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ini");

        let schema = app_schema();
        let mut config = AppConfig::default();
        Loader::new()
            .allow_missing(true)
            .load(&path, &schema, &mut config)
            .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn base_dir_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("conf.ini"), WELL_FORMED).unwrap();

        let schema = app_schema();
        let mut config = AppConfig::default();
        Loader::with_base_dir(dir.path())
            .load("conf.ini", &schema, &mut config)
            .unwrap();
        assert_eq!(config.mysql.port, 3306);
    }
}
