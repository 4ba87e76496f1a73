//! Client-supplied list parameters and their decoding.
//!
//! Parameters arrive either as a native [`ListerParams`], a JSON document,
//! or a Base64-URL encoded JSON document (handy in query strings):
//!
//! ```
//! use std::sync::Arc;
//! use sql_lister::{Lister, Policy};
//!
//! let raw = r#"{ "page": 2, "limit": 100, "sorts": [{ "field": "name", "order": "desc" }] }"#;
//!
//! let mut lister = Lister::from_json(raw, Arc::new(Policy::default())).unwrap();
//! lister.set_total(1000);
//!
//! assert_eq!(lister.render_clause(), r#" ORDER BY "name" DESC LIMIT 100 OFFSET 100"#);
//! ```

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::lister::Values;
use crate::{DecodeFailure, Lister, Policy, Result, Sort};

/// Raw list parameters as sent by a client.
///
/// Missing fields take their zero value; policy checks happen when the
/// parameters are applied to a [`Lister`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListerParams {
   #[serde(deserialize_with = "null_as_default")]
   pub page: u64,
   #[serde(deserialize_with = "null_as_default")]
   pub limit: u32,
   #[serde(deserialize_with = "null_as_default")]
   pub sorts: Vec<Sort>,
   #[serde(deserialize_with = "null_as_default")]
   pub search: String,
   pub filters: Option<Values>,
}

/// Deserialize `null` as the type's zero value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
   D: Deserializer<'de>,
   T: Default + Deserialize<'de>,
{
   Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ListerParams {
   /// Decode parameters from a JSON document.
   pub fn from_json(data: &str) -> Result<Self> {
      Ok(serde_json::from_str(data)?)
   }

   /// Decode parameters from Base64-URL (padded) encoded JSON.
   pub fn from_base64_json(data: &str) -> Result<Self> {
      let decoded = URL_SAFE.decode(data)?;
      Ok(serde_json::from_slice(&decoded)?)
   }

   /// Encode as Base64-URL (padded) JSON, the inverse of
   /// [`ListerParams::from_base64_json`].
   pub fn to_base64_json(&self) -> Result<String> {
      let json = serde_json::to_vec(self)?;
      Ok(URL_SAFE.encode(json))
   }
}

impl Lister {
   /// Build a lister by applying `params` through the policy-checked setters.
   pub fn from_params(params: ListerParams, policy: Arc<Policy>) -> Self {
      let mut lister = Lister::new(policy);
      lister.set_page(params.page).set_limit(params.limit);
      for sort in &params.sorts {
         lister.add_sort(&sort.field, sort.order);
      }
      lister.set_search(params.search).set_filters(params.filters);
      lister
   }

   /// Build a lister from a JSON document.
   ///
   /// On failure the error carries a lister with policy defaults only.
   pub fn from_json(
      data: &str,
      policy: Arc<Policy>,
   ) -> std::result::Result<Self, DecodeFailure> {
      match ListerParams::from_json(data) {
         Ok(params) => Ok(Lister::from_params(params, policy)),
         Err(e) => Err(DecodeFailure::new(e, Lister::new(policy))),
      }
   }

   /// Build a lister from Base64-URL encoded JSON.
   ///
   /// On failure the error carries a lister with policy defaults only.
   pub fn from_base64_json(
      data: &str,
      policy: Arc<Policy>,
   ) -> std::result::Result<Self, DecodeFailure> {
      match ListerParams::from_base64_json(data) {
         Ok(params) => Ok(Lister::from_params(params, policy)),
         Err(e) => Err(DecodeFailure::new(e, Lister::new(policy))),
      }
   }

   /// Like [`Lister::from_json`], but logs decode failures and falls back to
   /// policy defaults.
   pub fn from_json_or_default(data: &str, policy: Arc<Policy>) -> Self {
      Lister::from_json(data, policy).unwrap_or_else(|failure| {
         warn!(error = %failure.error(), "Invalid list parameters, using defaults");
         failure.into_fallback()
      })
   }

   /// Like [`Lister::from_base64_json`], but logs decode failures and falls
   /// back to policy defaults.
   pub fn from_base64_json_or_default(data: &str, policy: Arc<Policy>) -> Self {
      Lister::from_base64_json(data, policy).unwrap_or_else(|failure| {
         warn!(error = %failure.error(), "Invalid list parameters, using defaults");
         failure.into_fallback()
      })
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::{Error, Order};
   use serde_json::json;

   #[test]
   fn missing_fields_take_zero_values() {
      let params = ListerParams::from_json("{}").unwrap();
      assert_eq!(params, ListerParams::default());
      assert!(params.filters.is_none());
   }

   #[test]
   fn null_fields_take_zero_values() {
      let params = ListerParams::from_json(
         r#"{ "page": null, "limit": null, "sorts": null, "search": null, "filters": null }"#,
      )
      .unwrap();
      assert_eq!(params, ListerParams::default());
   }

   #[test]
   fn unknown_fields_are_ignored() {
      let params = ListerParams::from_json(r#"{ "page": 4, "cursor": "abc" }"#).unwrap();
      assert_eq!(params.page, 4);
   }

   #[test]
   fn sorts_accept_loose_orders() {
      let params = ListerParams::from_json(
         r#"{ "sorts": [{ "field": "a", "order": "DESC" }, { "field": "b", "order": -1 }, { "field": "c" }] }"#,
      )
      .unwrap();

      let orders: Vec<Order> = params.sorts.iter().map(|s| s.order).collect();
      assert_eq!(orders, vec![Order::Desc, Order::Desc, Order::Asc]);
   }

   #[test]
   fn negative_limit_is_a_decode_error() {
      let err = ListerParams::from_json(r#"{ "limit": -5 }"#).unwrap_err();
      assert!(matches!(err, Error::Json(_)));
   }

   #[test]
   fn base64_round_trip() {
      let params = ListerParams {
         page: 2,
         limit: 50,
         sorts: vec![Sort::desc("name")],
         search: "Jack ma".to_string(),
         filters: None,
      };

      let encoded = params.to_base64_json().unwrap();
      assert_eq!(ListerParams::from_base64_json(&encoded).unwrap(), params);
   }

   #[test]
   fn invalid_base64_is_reported() {
      let err = ListerParams::from_base64_json("not base64!").unwrap_err();
      assert_eq!(err.error_code(), "INVALID_BASE64");
   }

   #[test]
   fn base64_of_invalid_json_is_a_json_error() {
      let encoded = URL_SAFE.encode("{ nope");
      let err = ListerParams::from_base64_json(&encoded).unwrap_err();
      assert_eq!(err.error_code(), "INVALID_JSON");
   }

   #[test]
   fn from_params_applies_policy() {
      let policy = Arc::new(Policy::builder().sorts("id", ["id", "name"]).build());
      let params = ListerParams {
         page: 1,
         limit: 33,
         sorts: vec![Sort::asc("secret"), Sort::desc("name")],
         search: String::new(),
         filters: Some(Values::from([("k".to_string(), json!("v"))])),
      };

      let lister = Lister::from_params(params, policy);
      assert_eq!(lister.limit(), 25);
      assert_eq!(lister.sort().as_ref(), &[Sort::desc("name")]);
      assert_eq!(lister.cast_filter("k").string_or(""), "v");
   }

   #[test]
   fn or_default_constructors_fall_back() {
      let policy = Arc::new(Policy::builder().default_limit(50).build());

      let lister = Lister::from_json_or_default("[", policy.clone());
      assert_eq!(lister.limit(), 50);
      assert_eq!(lister.page(), 0);

      let lister = Lister::from_base64_json_or_default("%%%", policy);
      assert_eq!(lister.limit(), 50);
      assert!(lister.filters().is_empty());
   }
}
