use crate::Lister;

/// Result type alias for lister operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for decoding list parameters.
///
/// Policy violations (unknown page sizes, disallowed sort fields) are never
/// errors; they are coerced or dropped by [`Lister`]. Only the ingestion
/// boundary can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Parameter payload is not valid JSON or does not match the expected shape.
   #[error("invalid list parameters: {0}")]
   Json(#[from] serde_json::Error),

   /// Parameter payload is not valid Base64-URL.
   #[error("invalid base64 list parameters: {0}")]
   Base64(#[from] base64::DecodeError),
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for API responses.
   pub fn error_code(&self) -> String {
      match self {
         Error::Json(_) => "INVALID_JSON".to_string(),
         Error::Base64(_) => "INVALID_BASE64".to_string(),
      }
   }
}

/// A decode error paired with a lister built purely from policy defaults.
///
/// Callers that don't care why the payload was rejected can keep going with
/// [`DecodeFailure::into_fallback`].
#[derive(Debug, thiserror::Error)]
#[error("could not decode list parameters, using policy defaults")]
pub struct DecodeFailure {
   #[source]
   error: Error,
   fallback: Lister,
}

impl DecodeFailure {
   pub(crate) fn new(error: impl Into<Error>, fallback: Lister) -> Self {
      Self {
         error: error.into(),
         fallback,
      }
   }

   /// The underlying decode error.
   pub fn error(&self) -> &Error {
      &self.error
   }

   /// The policy-default lister built in place of the rejected payload.
   pub fn fallback(&self) -> &Lister {
      &self.fallback
   }

   /// Discard the error and keep the policy-default lister.
   pub fn into_fallback(self) -> Lister {
      self.fallback
   }

   /// Split into the error and the fallback lister.
   pub fn into_parts(self) -> (Error, Lister) {
      (self.error, self.fallback)
   }
}
