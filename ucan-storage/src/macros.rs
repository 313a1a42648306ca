//--------------------------------------------------------------------------------------------------
// Macros
//--------------------------------------------------------------------------------------------------

/// A macro for writing a list of raw capabilities as JSON objects.
///
/// ```
/// use ucan_storage::caps;
///
/// let did = "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp";
/// let capabilities = caps![
///     { "with": format!("storage://{did}"), "can": "upload/*" },
///     { "with": "prf:*", "can": "upload/IMPORT", "mh": "bafy" },
/// ];
///
/// assert_eq!(capabilities[1].with(), Some("prf:*"));
/// ```
#[macro_export]
macro_rules! caps {
    [$({
        $( $key:literal : $value:expr ),* $(,)?
    }),* $(,)?] => {
        ::std::vec![$(
            {
                #[allow(unused_mut)]
                let mut fields = $crate::serde_json::Map::new();
                $(
                    fields.insert($key.to_string(), $crate::serde_json::json!($value));
                )*
                $crate::RawCapability::from(fields)
            }
        ),*]
    };
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
