//! Schema description for sectioned key/value files
//!
//! A [`Schema`] is built once per record type with [`SchemaBuilder`] and is
//! immutable afterwards. It carries the two-level name space of the file
//! format: declared section names resolve to a nested sub-record of the
//! target, and declared key names resolve to a setter for one leaf field
//! together with the primitive kind its text is coerced into. Resolution
//! operates on the schema alone and never consults parsed values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LoadError, LoadResult};

/// Primitive kind a key's value is coerced into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Assigned verbatim
    Text,
    /// Base-10 signed 64-bit integer
    Integer,
    /// Decimal or exponential 64-bit float
    Float,
    /// `true`/`false`/`t`/`f`/`1`/`0`, case-insensitive
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "floating-point number"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// Tagged union of typed setter closures
///
/// Keeps the kind-directed conversion and the write co-located: the variant
/// fixes the coercion, the closure performs the write.
enum FieldSetter<S> {
    Text(Box<dyn Fn(&mut S, String) + Send + Sync>),
    Integer(Box<dyn Fn(&mut S, i64) + Send + Sync>),
    Float(Box<dyn Fn(&mut S, f64) + Send + Sync>),
    Boolean(Box<dyn Fn(&mut S, bool) + Send + Sync>),
}

/// One declared key of a section: external name plus the setter for the
/// leaf field it binds to
struct KeyBinding<S> {
    name: String,
    setter: FieldSetter<S>,
}

/// Outcome of binding one assignment line against a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindOutcome {
    /// The value was coerced and written
    Written,
    /// The key is not declared by the section; the line is ignored
    UnknownKey,
    /// The value could not be coerced to the declared kind
    Mismatch(ValueKind),
}

/// A named section of the schema, erased over its sub-record type so a
/// [`Schema`] can hold sections of heterogeneous shapes
pub(crate) trait SectionBinding<T>: Send + Sync {
    /// Declared section name
    fn name(&self) -> &str;

    /// Resolve `key` and, if declared, coerce `raw` and write it into the
    /// section's sub-record inside `target`
    fn bind(&self, target: &mut T, key: &str, raw: &str) -> BindOutcome;
}

/// Concrete section binding for a sub-record of type `S`
struct Section<T, S> {
    name: String,
    accessor: fn(&mut T) -> &mut S,
    keys: Vec<KeyBinding<S>>,
}

impl<T, S> SectionBinding<T> for Section<T, S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn bind(&self, target: &mut T, key: &str, raw: &str) -> BindOutcome {
        let Some(binding) = self.keys.iter().find(|k| k.name == key) else {
            return BindOutcome::UnknownKey;
        };
        let sub = (self.accessor)(target);
        match &binding.setter {
            FieldSetter::Text(set) => {
                set(sub, raw.to_string());
                BindOutcome::Written
            }
            FieldSetter::Integer(set) => match raw.parse::<i64>() {
                Ok(value) => {
                    set(sub, value);
                    BindOutcome::Written
                }
                Err(_) => BindOutcome::Mismatch(ValueKind::Integer),
            },
            FieldSetter::Float(set) => match raw.parse::<f64>() {
                Ok(value) => {
                    set(sub, value);
                    BindOutcome::Written
                }
                Err(_) => BindOutcome::Mismatch(ValueKind::Float),
            },
            FieldSetter::Boolean(set) => match parse_bool(raw) {
                Some(value) => {
                    set(sub, value);
                    BindOutcome::Written
                }
                None => BindOutcome::Mismatch(ValueKind::Boolean),
            },
        }
    }
}

/// Parse the conventional truthy/falsy literal set, case-insensitively
fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("t") || raw == "1" {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw.eq_ignore_ascii_case("f") || raw == "0" {
        Some(false)
    } else {
        None
    }
}

/// Declared shape of a configuration record
///
/// Immutable and reusable across loads; build one with [`Schema::builder`].
pub struct Schema<T> {
    sections: Vec<Box<dyn SectionBinding<T>>>,
}

impl<T: 'static> Schema<T> {
    /// Start declaring a schema for the record type `T`
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder {
            sections: Vec::new(),
            defect: None,
        }
    }
}

impl<T> Schema<T> {
    /// Resolve a section header name, case-sensitively, in declaration order
    pub(crate) fn resolve_section(&self, name: &str) -> Option<&dyn SectionBinding<T>> {
        self.sections
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    /// Number of declared sections
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Declared section names, in declaration order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name())
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("sections", &self.section_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Schema`]
///
/// Declaration defects (duplicate section names, duplicate key names within
/// a section) are detected as sections are declared and reported once, from
/// [`SchemaBuilder::build`].
pub struct SchemaBuilder<T> {
    sections: Vec<Box<dyn SectionBinding<T>>>,
    defect: Option<String>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Declare a section: its external name, the accessor projecting the
    /// target record onto the sub-record it configures, and its keys
    pub fn section<S: 'static>(
        mut self,
        name: impl Into<String>,
        accessor: fn(&mut T) -> &mut S,
        keys: impl FnOnce(SectionBuilder<S>) -> SectionBuilder<S>,
    ) -> Self {
        let name = name.into();
        if self.sections.iter().any(|s| s.name() == name) {
            self.defect
                .get_or_insert_with(|| format!("duplicate section name `{name}`"));
            return self;
        }

        let section_keys = keys(SectionBuilder { keys: Vec::new() }).keys;
        for (idx, key) in section_keys.iter().enumerate() {
            if section_keys[..idx].iter().any(|k| k.name == key.name) {
                self.defect.get_or_insert_with(|| {
                    format!("duplicate key name `{}` in section `{name}`", key.name)
                });
                return self;
            }
        }

        self.sections.push(Box::new(Section {
            name,
            accessor,
            keys: section_keys,
        }));
        self
    }

    /// Validate the declarations and produce the immutable schema
    pub fn build(self) -> LoadResult<Schema<T>> {
        match self.defect {
            Some(message) => Err(LoadError::schema(message)),
            None => Ok(Schema {
                sections: self.sections,
            }),
        }
    }
}

/// Builder for one section's key bindings
pub struct SectionBuilder<S> {
    keys: Vec<KeyBinding<S>>,
}

impl<S> SectionBuilder<S> {
    /// Bind `name` to a text field; the value is assigned verbatim
    pub fn text(
        mut self,
        name: impl Into<String>,
        set: impl Fn(&mut S, String) + Send + Sync + 'static,
    ) -> Self {
        self.keys.push(KeyBinding {
            name: name.into(),
            setter: FieldSetter::Text(Box::new(set)),
        });
        self
    }

    /// Bind `name` to an integer field; the value is parsed as base-10
    /// signed 64-bit
    pub fn integer(
        mut self,
        name: impl Into<String>,
        set: impl Fn(&mut S, i64) + Send + Sync + 'static,
    ) -> Self {
        self.keys.push(KeyBinding {
            name: name.into(),
            setter: FieldSetter::Integer(Box::new(set)),
        });
        self
    }

    /// Bind `name` to a floating-point field; the value is parsed as a
    /// decimal or exponential numeral
    pub fn float(
        mut self,
        name: impl Into<String>,
        set: impl Fn(&mut S, f64) + Send + Sync + 'static,
    ) -> Self {
        self.keys.push(KeyBinding {
            name: name.into(),
            setter: FieldSetter::Float(Box::new(set)),
        });
        self
    }

    /// Bind `name` to a boolean field; the value is parsed from the
    /// conventional truthy/falsy literal set
    pub fn boolean(
        mut self,
        name: impl Into<String>,
        set: impl Fn(&mut S, bool) + Send + Sync + 'static,
    ) -> Self {
        self.keys.push(KeyBinding {
            name: name.into(),
            setter: FieldSetter::Boolean(Box::new(set)),
        });
        self
    }
}
