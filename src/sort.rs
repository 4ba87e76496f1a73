use serde::{Deserialize, Serialize};

use crate::Order;
use crate::params::null_as_default;

/// A field to sort by and its order.
///
/// Sequence order matters: the first sort is the primary ORDER BY column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
   /// Column name as it appears in the query
   #[serde(default, deserialize_with = "null_as_default")]
   pub field: String,
   /// Sort order for this column
   #[serde(default)]
   pub order: Order,
}

impl Sort {
   pub fn new(field: impl Into<String>, order: Order) -> Self {
      Self {
         field: field.into(),
         order,
      }
   }

   /// Create a sort with ascending order.
   pub fn asc(field: impl Into<String>) -> Self {
      Self::new(field, Order::Asc)
   }

   /// Create a sort with descending order.
   pub fn desc(field: impl Into<String>) -> Self {
      Self::new(field, Order::Desc)
   }
}

/// Wrap an identifier in `quote`, doubling any embedded quote characters.
pub(crate) fn quote_identifier(name: &str, quote: char) -> String {
   let mut escaped = String::with_capacity(name.len() + 2);
   escaped.push(quote);
   for ch in name.chars() {
      if ch == quote {
         escaped.push(quote);
      }
      escaped.push(ch);
   }
   escaped.push(quote);
   escaped
}
