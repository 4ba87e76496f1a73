//! Server-side policy for page sizes, sort fields and SQL dialect.
//!
//! A [`Policy`] is built once and shared read-only between listers. Every
//! builder mutator checks its own input and ignores zero or blank values, so
//! a policy can never end up with a zero default limit or a blank default
//! sort field.
//!
//! # Example
//!
//! ```
//! use sql_lister::Policy;
//!
//! let policy = Policy::builder()
//!    .limits(20, [10, 20, 30])
//!    .sorts("id", ["id", "name", "mobile"])
//!    .mysql()
//!    .build();
//!
//! assert_eq!(policy.validate_limit(30), 30);
//! assert_eq!(policy.validate_limit(100), 20);
//! assert_eq!(policy.validate_sort_field(" name "), "name");
//! assert_eq!(policy.validate_sort_field("password"), "id");
//! ```

use indexmap::IndexSet;
use serde::Deserialize;
use tracing::trace;

use crate::{Sort, SqlDialect};

const DEFAULT_LIMIT: u32 = 25;
const DEFAULT_SORT: &str = "id";
const DEFAULT_ALLOWED_LIMITS: [u32; 4] = [25, 50, 100, 250];

/// Validation rules applied to every lister mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
   default_limit: u32,
   default_sort: String,
   limits: IndexSet<u32>,
   sorts: IndexSet<String>,
   dialect: SqlDialect,
}

impl Default for Policy {
   fn default() -> Self {
      Self {
         default_limit: DEFAULT_LIMIT,
         default_sort: DEFAULT_SORT.to_string(),
         limits: DEFAULT_ALLOWED_LIMITS.into_iter().collect(),
         sorts: IndexSet::new(),
         dialect: SqlDialect::default(),
      }
   }
}

impl Policy {
   /// Start from the base policy: limit 25 of {25, 50, 100, 250}, sort by
   /// `id`, any sort field allowed, PostgreSQL rendering.
   pub fn builder() -> PolicyBuilder {
      PolicyBuilder::default()
   }

   /// Build a policy from deserialized configuration.
   ///
   /// Values go through the same mutators as [`PolicyBuilder`], so zero or
   /// blank entries fall back to the base defaults. An empty
   /// `allowed_limits` list lifts the page size restriction.
   pub fn from_config(config: &PolicyConfig) -> Self {
      let builder = Policy::builder();
      let builder = if config.allowed_limits.is_empty() {
         builder.default_limit(config.default_limit).any_limit()
      } else {
         builder.limits(config.default_limit, config.allowed_limits.iter().copied())
      };

      builder
         .sorts(&config.default_sort, config.allowed_sorts.iter())
         .dialect(config.dialect)
         .build()
   }

   /// Page size used when the client sends none or an invalid one.
   pub fn default_limit(&self) -> u32 {
      self.default_limit
   }

   /// Sort field used when the client sends no valid sort.
   pub fn default_sort(&self) -> &str {
      &self.default_sort
   }

   /// Allowed page sizes; empty means any positive size.
   pub fn allowed_limits(&self) -> &IndexSet<u32> {
      &self.limits
   }

   /// Allowed sort fields; empty means any non-blank field.
   pub fn allowed_sorts(&self) -> &IndexSet<String> {
      &self.sorts
   }

   pub fn dialect(&self) -> SqlDialect {
      self.dialect
   }

   /// Return `limit` if it is positive and allowed, otherwise the default.
   pub fn validate_limit(&self, limit: u32) -> u32 {
      if limit > 0 && (self.limits.is_empty() || self.limits.contains(&limit)) {
         return limit;
      }

      trace!(limit, default = self.default_limit, "Page size rejected by policy");
      self.default_limit
   }

   /// Return the trimmed `field` if it is non-blank and allowed, otherwise
   /// the default sort field.
   pub fn validate_sort_field<'a>(&'a self, field: &'a str) -> &'a str {
      let field = field.trim();
      if !field.is_empty() && (self.sorts.is_empty() || self.sorts.contains(field)) {
         return field;
      }

      trace!(field, default = %self.default_sort, "Sort field rejected by policy");
      &self.default_sort
   }

   /// The single sort used when a lister has none.
   pub fn fallback_sort(&self) -> Sort {
      Sort::asc(self.default_sort.clone())
   }

   /// Render the sort and paging clause in this policy's dialect.
   pub fn render(&self, sorts: &[Sort], from: u64, limit: u32) -> String {
      self.dialect.render(sorts, from, limit)
   }
}

/// Ordered set of policy mutators.
///
/// Mutators apply in call order; a later call overrides an earlier one that
/// touched the same setting.
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
   policy: Policy,
}

impl PolicyBuilder {
   /// Set the default page size and the allowed page sizes.
   ///
   /// Zero sizes are discarded. The allowed set is only replaced when at
   /// least one non-zero size remains.
   pub fn limits(mut self, default: u32, allowed: impl IntoIterator<Item = u32>) -> Self {
      let allowed: IndexSet<u32> = allowed.into_iter().filter(|&v| v > 0).collect();

      if default > 0 {
         self.policy.default_limit = default;
      }
      if !allowed.is_empty() {
         self.policy.limits = allowed;
      }
      self
   }

   /// Set the default sort field and the allowed sort fields.
   ///
   /// Blank entries are discarded. Unlike [`PolicyBuilder::limits`], the
   /// allowed set is always replaced, so passing no fields allows any field.
   pub fn sorts<I, S>(mut self, default: &str, allowed: I) -> Self
   where
      I: IntoIterator<Item = S>,
      S: AsRef<str>,
   {
      let default = default.trim();
      if !default.is_empty() {
         self.policy.default_sort = default.to_string();
      }

      self.policy.sorts = allowed
         .into_iter()
         .filter(|v| !v.as_ref().trim().is_empty())
         .map(|v| v.as_ref().to_string())
         .collect();
      self
   }

   /// Set the default page size, ignoring zero.
   pub fn default_limit(mut self, default: u32) -> Self {
      if default > 0 {
         self.policy.default_limit = default;
      }
      self
   }

   /// Set the default sort field, ignoring blank values.
   pub fn default_sort(mut self, default: &str) -> Self {
      let default = default.trim();
      if !default.is_empty() {
         self.policy.default_sort = default.to_string();
      }
      self
   }

   /// Allow any positive page size.
   pub fn any_limit(mut self) -> Self {
      self.policy.limits.clear();
      self
   }

   /// Render clauses with MySQL syntax.
   pub fn mysql(self) -> Self {
      self.dialect(SqlDialect::MySql)
   }

   /// Render clauses with PostgreSQL syntax.
   pub fn postgres(self) -> Self {
      self.dialect(SqlDialect::Postgres)
   }

   pub fn dialect(mut self, dialect: SqlDialect) -> Self {
      self.policy.dialect = dialect;
      self
   }

   pub fn build(self) -> Policy {
      self.policy
   }
}

/// Deserializable policy settings.
///
/// # Examples
///
/// ```
/// use sql_lister::{Policy, PolicyConfig, SqlDialect};
///
/// // Override just one field
/// let config = PolicyConfig {
///    dialect: SqlDialect::MySql,
///    ..Default::default()
/// };
///
/// let policy = Policy::from_config(&config);
/// assert_eq!(policy.dialect(), SqlDialect::MySql);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyConfig {
   /// Page size used when none or an invalid one is requested
   ///
   /// Default: 25
   pub default_limit: u32,

   /// Page sizes clients may request; empty allows any positive size
   ///
   /// Default: [25, 50, 100, 250]
   pub allowed_limits: Vec<u32>,

   /// Sort field used when none or an invalid one is requested
   ///
   /// Default: "id"
   pub default_sort: String,

   /// Sort fields clients may request; empty allows any field
   ///
   /// Default: []
   pub allowed_sorts: Vec<String>,

   /// SQL dialect for rendered clauses
   ///
   /// Default: postgres
   pub dialect: SqlDialect,
}

impl Default for PolicyConfig {
   fn default() -> Self {
      Self {
         default_limit: DEFAULT_LIMIT,
         allowed_limits: DEFAULT_ALLOWED_LIMITS.to_vec(),
         default_sort: DEFAULT_SORT.to_string(),
         allowed_sorts: Vec::new(),
         dialect: SqlDialect::default(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   // ─── base policy ───

   #[test]
   fn base_policy_defaults() {
      let policy = Policy::default();

      assert_eq!(policy.default_limit(), 25);
      assert_eq!(policy.default_sort(), "id");
      assert_eq!(
         policy.allowed_limits().iter().copied().collect::<Vec<_>>(),
         vec![25, 50, 100, 250]
      );
      assert!(policy.allowed_sorts().is_empty());
      assert_eq!(policy.dialect(), SqlDialect::Postgres);
      assert_eq!(Policy::builder().build(), policy);
   }

   // ─── validate_limit ───

   #[test]
   fn validate_limit_accepts_allowed() {
      let policy = Policy::default();
      assert_eq!(policy.validate_limit(50), 50);
      assert_eq!(policy.validate_limit(250), 250);
   }

   #[test]
   fn validate_limit_substitutes_default() {
      let policy = Policy::default();
      assert_eq!(policy.validate_limit(0), 25);
      assert_eq!(policy.validate_limit(30), 25);
   }

   #[test]
   fn validate_limit_unrestricted() {
      let policy = Policy::builder().any_limit().build();
      assert_eq!(policy.validate_limit(7), 7);
      assert_eq!(policy.validate_limit(0), 25);
   }

   // ─── validate_sort_field ───

   #[test]
   fn validate_sort_field_unrestricted_trims() {
      let policy = Policy::default();
      assert_eq!(policy.validate_sort_field("  name "), "name");
      assert_eq!(policy.validate_sort_field("   "), "id");
      assert_eq!(policy.validate_sort_field(""), "id");
   }

   #[test]
   fn validate_sort_field_restricted() {
      let policy = Policy::builder().sorts("name", ["name", "email"]).build();
      assert_eq!(policy.validate_sort_field("email"), "email");
      assert_eq!(policy.validate_sort_field("id"), "name");
   }

   // ─── builder mutators ───

   #[test]
   fn limits_ignores_zero_values() {
      let policy = Policy::builder().limits(0, [0, 0]).build();
      assert_eq!(policy.default_limit(), 25);
      assert_eq!(policy.allowed_limits().len(), 4);

      let policy = Policy::builder().limits(10, [0, 10, 20]).build();
      assert_eq!(policy.default_limit(), 10);
      assert_eq!(
         policy.allowed_limits().iter().copied().collect::<Vec<_>>(),
         vec![10, 20]
      );
   }

   #[test]
   fn sorts_always_replaces_allowed_set() {
      let policy = Policy::builder()
         .sorts("id", ["id", "name"])
         .sorts(" ", Vec::<String>::new())
         .build();

      assert_eq!(policy.default_sort(), "id");
      assert!(policy.allowed_sorts().is_empty());
   }

   #[test]
   fn sorts_drops_blank_fields() {
      let policy = Policy::builder().sorts("name", ["name", "", "  "]).build();
      assert_eq!(policy.allowed_sorts().len(), 1);
   }

   #[test]
   fn later_mutators_win() {
      let policy = Policy::builder()
         .default_limit(10)
         .default_limit(0)
         .default_limit(50)
         .default_sort("name")
         .default_sort("")
         .mysql()
         .postgres()
         .build();

      assert_eq!(policy.default_limit(), 50);
      assert_eq!(policy.default_sort(), "name");
      assert_eq!(policy.dialect(), SqlDialect::Postgres);
   }

   #[test]
   fn fallback_sort_uses_default_field() {
      let policy = Policy::builder().default_sort("created_at").build();
      assert_eq!(policy.fallback_sort(), Sort::asc("created_at"));
   }

   // ─── PolicyConfig ───

   #[test]
   fn default_config_matches_base_policy() {
      assert_eq!(Policy::from_config(&PolicyConfig::default()), Policy::default());
   }

   #[test]
   fn config_deserializes_partial_document() {
      let config: PolicyConfig = serde_json::from_str(
         r#"{ "defaultLimit": 20, "allowedLimits": [10, 20, 30], "dialect": "mysql" }"#,
      )
      .unwrap();

      assert_eq!(config.default_sort, "id");

      let policy = Policy::from_config(&config);
      assert_eq!(policy.default_limit(), 20);
      assert_eq!(policy.validate_limit(30), 30);
      assert_eq!(policy.validate_limit(25), 20);
      assert_eq!(policy.dialect(), SqlDialect::MySql);
   }

   #[test]
   fn config_empty_allowed_limits_is_unrestricted() {
      let config = PolicyConfig {
         allowed_limits: Vec::new(),
         ..Default::default()
      };

      let policy = Policy::from_config(&config);
      assert!(policy.allowed_limits().is_empty());
      assert_eq!(policy.validate_limit(13), 13);
   }

   #[test]
   fn config_with_invalid_values_stays_usable() {
      let config = PolicyConfig {
         default_limit: 0,
         default_sort: "  ".to_string(),
         ..Default::default()
      };

      let policy = Policy::from_config(&config);
      assert_eq!(policy.default_limit(), 25);
      assert_eq!(policy.default_sort(), "id");
   }
}
