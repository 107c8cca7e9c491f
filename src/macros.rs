/// setters shared by every per-call options struct
///
/// the struct must have `transaction_id: Option<String>` and
/// `headers: HashMap<String, String>` fields.
macro_rules! call_options {
    ($($name:ident),+ $(,)?) => {
        $(
            impl $name {
                /// sent as the `Transaction-Id` header
                pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
                    self.transaction_id = Some(transaction_id.into());
                    self
                }

                pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                    self.headers.insert(name.into(), value.into());
                    self
                }

                pub fn with_headers(mut self, headers: std::collections::HashMap<String, String>) -> Self {
                    self.headers.extend(headers);
                    self
                }
            }
        )+
    };
}

/// fail with a validation error when a required string option is blank
macro_rules! require {
    ($value:expr, $field:literal) => {
        if $value.trim().is_empty() {
            return Err($crate::service::SdkError::Validation(format!(
                "{} cannot be empty",
                $field
            )));
        }
    };
}
