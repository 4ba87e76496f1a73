//! Per-request list query state and pagination arithmetic.

use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Value as JsonValue, json};
use tracing::{debug, trace};

use crate::{Caster, Order, Policy, Sort};

/// Arbitrary string-keyed values attached to a lister (filters, metadata).
pub type Values = IndexMap<String, JsonValue>;

/// Validated list query for a single request.
///
/// Every setter runs its input through the shared [`Policy`]; invalid input
/// is coerced or dropped, never rejected. Pagination fields (`total`,
/// `pages`, `from`, `to`) stay zero until [`Lister::set_total`] is called
/// with a non-zero row count.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sql_lister::{Lister, Order, Policy};
///
/// let policy = Arc::new(
///    Policy::builder()
///       .limits(20, [10, 20, 30])
///       .sorts("id", ["id", "name", "mobile"])
///       .build(),
/// );
///
/// let mut lister = Lister::new(policy);
/// lister
///    .add_sort("name", Order::parse(-1))
///    .add_sort("mobile", Order::Desc)
///    .set_limit(100)
///    .set_page(100)
///    .set_total(101);
///
/// assert_eq!(lister.page(), 6);
/// assert_eq!(lister.limit(), 20);
/// assert_eq!(
///    lister.render_clause(),
///    r#" ORDER BY "name" DESC, "mobile" DESC LIMIT 20 OFFSET 100"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Lister {
   policy: Arc<Policy>,

   page: u64,
   limit: u32,
   search: String,
   sorts: Vec<Sort>,
   filters: Values,
   meta: Values,

   total: u64,
   pages: u64,
   from: u64,
   to: u64,
}

impl Lister {
   /// Create an empty lister governed by `policy`.
   pub fn new(policy: Arc<Policy>) -> Self {
      Self {
         policy,
         ..Default::default()
      }
   }

   /// The policy this lister validates against.
   pub fn policy(&self) -> &Policy {
      &self.policy
   }

   // ─── page ───

   /// Store the requested page. It is clamped into range by
   /// [`Lister::set_total`].
   pub fn set_page(&mut self, page: u64) -> &mut Self {
      self.page = page;
      self
   }

   /// Current page; `0` until pagination has been resolved or while the
   /// result set is empty.
   pub fn page(&self) -> u64 {
      self.page
   }

   pub fn pages(&self) -> u64 {
      self.pages
   }

   // ─── limit ───

   pub fn set_limit(&mut self, limit: u32) -> &mut Self {
      self.limit = self.policy.validate_limit(limit);
      self
   }

   /// Page size, falling back to the policy default when unset.
   pub fn limit(&self) -> u32 {
      if self.limit == 0 {
         self.policy.default_limit()
      } else {
         self.limit
      }
   }

   // ─── sorts ───

   /// Append a sort if the policy accepts `field` exactly as given.
   ///
   /// A rejected field is dropped rather than replaced by the default sort
   /// field, and so is one that only passes after trimming.
   pub fn add_sort(&mut self, field: &str, order: Order) -> &mut Self {
      if self.policy.validate_sort_field(field) == field {
         self.sorts.push(Sort::new(field, order));
      } else {
         trace!(field, "Dropping sort rejected by policy");
      }
      self
   }

   /// Sorts in insertion order, or the policy's fallback sort when none were
   /// added.
   pub fn sort(&self) -> Cow<'_, [Sort]> {
      if self.sorts.is_empty() {
         Cow::Owned(vec![self.policy.fallback_sort()])
      } else {
         Cow::Borrowed(&self.sorts)
      }
   }

   // ─── search ───

   pub fn set_search(&mut self, search: impl Into<String>) -> &mut Self {
      self.search = search.into();
      self
   }

   pub fn search(&self) -> &str {
      &self.search
   }

   // ─── filters ───

   /// Replace all filters. `None` clears them.
   pub fn set_filters(&mut self, filters: impl Into<Option<Values>>) -> &mut Self {
      self.filters = filters.into().unwrap_or_default();
      self
   }

   pub fn add_filter(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> &mut Self {
      self.filters.insert(key.into(), value.into());
      self
   }

   pub fn filters(&self) -> &Values {
      &self.filters
   }

   pub fn filter(&self, key: &str) -> Option<&JsonValue> {
      self.filters.get(key)
   }

   pub fn has_filter(&self, key: &str) -> bool {
      self.filters.contains_key(key)
   }

   /// Coerce a filter value; missing keys yield the caster's fallbacks.
   pub fn cast_filter(&self, key: &str) -> Caster<'_> {
      Caster::new(self.filters.get(key))
   }

   // ─── meta ───

   /// Attach a value that is echoed in [`Lister::response`].
   pub fn add_meta(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> &mut Self {
      self.meta.insert(key.into(), value.into());
      self
   }

   pub fn meta_data(&self) -> &Values {
      &self.meta
   }

   pub fn meta(&self, key: &str) -> Option<&JsonValue> {
      self.meta.get(key)
   }

   pub fn has_meta(&self, key: &str) -> bool {
      self.meta.contains_key(key)
   }

   pub fn cast_meta(&self, key: &str) -> Caster<'_> {
      Caster::new(self.meta.get(key))
   }

   // ─── pagination ───

   /// Resolve pagination against the total row count.
   ///
   /// A zero total resets page, pages, from and to to zero. Otherwise the
   /// page is clamped into `1..=pages` and the window recomputed from the
   /// current page and limit, so repeated calls don't accumulate.
   pub fn set_total(&mut self, total: u64) -> &mut Self {
      if total == 0 {
         self.page = 0;
         self.total = 0;
         self.pages = 0;
         self.from = 0;
         self.to = 0;
         return self;
      }

      let limit = u64::from(self.limit());
      self.total = total;
      self.pages = total.div_ceil(limit);
      self.page = self.page.max(1).min(self.pages);
      self.from = (self.page - 1) * limit;
      self.to = self.from.saturating_add(limit).min(total);

      debug!(
         total,
         page = self.page,
         pages = self.pages,
         from = self.from,
         to = self.to,
         "Resolved pagination"
      );
      self
   }

   pub fn total(&self) -> u64 {
      self.total
   }

   /// Zero-based offset of the first row on the current page.
   pub fn from(&self) -> u64 {
      self.from
   }

   /// Exclusive offset past the last row on the current page.
   pub fn to(&self) -> u64 {
      self.to
   }

   // ─── output ───

   /// Render ` ORDER BY … LIMIT …` in the policy's dialect.
   pub fn render_clause(&self) -> String {
      self.policy.render(&self.sort(), self.from, self.limit())
   }

   /// Build the pagination payload for an API response.
   ///
   /// Contains every metadata entry plus `limit`, `sorts`, `search`, `page`,
   /// `total`, `from`, `to` and `pages`. `from` is one-based here; all five
   /// pagination values are zero for an empty or unresolved result set.
   pub fn response(&self) -> Values {
      let mut res = self.meta.clone();

      res.insert("limit".to_string(), json!(self.limit()));
      res.insert("sorts".to_string(), json!(self.sort()));
      res.insert("search".to_string(), json!(self.search));

      let (page, total, from, to, pages) = if self.total == 0 {
         (0, 0, 0, 0, 0)
      } else {
         (self.page, self.total, self.from + 1, self.to, self.pages)
      };
      res.insert("page".to_string(), json!(page));
      res.insert("total".to_string(), json!(total));
      res.insert("from".to_string(), json!(from));
      res.insert("to".to_string(), json!(to));
      res.insert("pages".to_string(), json!(pages));
      res
   }

   /// [`Lister::response`] with an added `data` entry.
   pub fn response_with_data(&self, data: impl Into<JsonValue>) -> Values {
      let mut res = self.response();
      res.insert("data".to_string(), data.into());
      res
   }
}
