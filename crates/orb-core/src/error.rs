//! Error types for Orb models.

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while decoding or validating a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A required key was absent from the JSON object.
    #[error("missing required field `{field}`")]
    MissingField {
        /// The JSON key that was absent.
        field: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// A field whose type disallows null was present as JSON `null`.
    #[error("unexpected null: {source}")]
    UnexpectedNull {
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// A string enum holds a value this client does not recognize.
    #[error("unknown {type_name} value: {value}")]
    UnknownEnumValue {
        /// Name of the enum type.
        type_name: &'static str,
        /// The raw wire value.
        value: String,
    },

    /// A union value could not be decoded.
    ///
    /// Raised directly from a [`UnionError`], or recovered from a serde error
    /// when the union sat inside a larger model.
    #[error("{message}")]
    Union {
        /// Which union rule failed.
        kind: UnionErrorKind,
        /// Name of the outermost union that failed.
        union: String,
        /// The full error text.
        message: String,
    },

    /// Any other JSON shape mismatch.
    #[error("invalid data: {0}")]
    Json(serde_json::Error),
}

impl From<UnionError> for ModelError {
    fn from(err: UnionError) -> Self {
        Self::Union {
            kind: err.kind(),
            union: err.union_name().to_owned(),
            message: err.to_string(),
        }
    }
}

// serde_json keeps only the message text of a data error. Union failures are
// recognized by the `UnionError` display formats below; missing fields and
// nulls by the texts of serde's `de::Error::missing_field` and
// `de::Error::invalid_type`. Only a message that starts with one of these
// texts is classified, so an error nested inside another message is not.
impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        if !err.is_data() {
            return Self::Json(err);
        }
        let message = err.to_string();
        if let Some((kind, union)) = UnionErrorKind::classify(&message) {
            return Self::Union {
                kind,
                union: union.to_owned(),
                message,
            };
        }
        if let Some(rest) = message.strip_prefix("missing field `") {
            if let Some(end) = rest.find('`') {
                return Self::MissingField {
                    field: rest[..end].to_owned(),
                    source: err,
                };
            }
        }
        if message.starts_with("invalid type: null") {
            return Self::UnexpectedNull { source: err };
        }
        Self::Json(err)
    }
}

/// Errors raised by the union codecs.
#[derive(Debug, thiserror::Error)]
pub enum UnionError {
    /// The discriminator key is absent or is not a string.
    #[error("{union}: discriminator `{field}` is missing or not a string")]
    MissingDiscriminator {
        /// Name of the union type.
        union: &'static str,
        /// The discriminator key.
        field: &'static str,
    },

    /// The discriminator holds a value outside the known table.
    #[error(
        "{union}: no variant matched {field}=`{value}` (expected one of: {})",
        .expected.join(", ")
    )]
    UnknownVariant {
        /// Name of the union type.
        union: &'static str,
        /// The discriminator key.
        field: &'static str,
        /// The unrecognized value.
        value: String,
        /// Every value the union accepts.
        expected: &'static [&'static str],
    },

    /// The discriminator matched but the body does not fit that variant.
    #[error("{union}: failed to decode variant `{variant}`: {source}")]
    VariantMismatch {
        /// Name of the union type.
        union: &'static str,
        /// The selected variant.
        variant: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// No candidate of a shape-probing union accepted the value.
    #[error("{union}: no variant matched ({})", .attempts.join("; "))]
    NoVariantMatched {
        /// Name of the union type.
        union: &'static str,
        /// One line per rejected candidate.
        attempts: Vec<String>,
    },
}

impl UnionError {
    /// Which rule this error reports.
    #[must_use]
    pub fn kind(&self) -> UnionErrorKind {
        match self {
            Self::MissingDiscriminator { .. } => UnionErrorKind::MissingDiscriminator,
            Self::UnknownVariant { .. } => UnionErrorKind::UnknownVariant,
            Self::VariantMismatch { .. } => UnionErrorKind::VariantMismatch,
            Self::NoVariantMatched { .. } => UnionErrorKind::NoVariantMatched,
        }
    }

    /// Name of the union type that failed.
    #[must_use]
    pub fn union_name(&self) -> &'static str {
        match self {
            Self::MissingDiscriminator { union, .. }
            | Self::UnknownVariant { union, .. }
            | Self::VariantMismatch { union, .. }
            | Self::NoVariantMatched { union, .. } => union,
        }
    }
}

/// The rule a [`UnionError`] reports, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnionErrorKind {
    /// See [`UnionError::MissingDiscriminator`].
    MissingDiscriminator,
    /// See [`UnionError::UnknownVariant`].
    UnknownVariant,
    /// See [`UnionError::VariantMismatch`].
    VariantMismatch,
    /// See [`UnionError::NoVariantMatched`].
    NoVariantMatched,
}

impl UnionErrorKind {
    /// Recognize a rendered [`UnionError`] at the start of `message`.
    ///
    /// Returns the kind and the union name.
    fn classify(message: &str) -> Option<(Self, &str)> {
        let (union, rest) = message.split_once(": ")?;
        let is_type_name = union.starts_with(|c: char| c.is_ascii_uppercase())
            && union.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !is_type_name {
            return None;
        }
        let kind = if rest.starts_with("discriminator `") {
            Self::MissingDiscriminator
        } else if rest.starts_with("no variant matched (") {
            Self::NoVariantMatched
        } else if rest.starts_with("no variant matched ") {
            Self::UnknownVariant
        } else if rest.starts_with("failed to decode variant `") {
            Self::VariantMismatch
        } else {
            return None;
        };
        Some((kind, union))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Named {
        id: String,
        name: String,
    }

    #[test]
    fn missing_field_is_classified() {
        let err = serde_json::from_str::<Named>(r#"{"id":"a"}"#).unwrap_err();
        match ModelError::from(err) {
            ModelError::MissingField { field, .. } => assert_eq!(field, "name"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn null_is_classified() {
        let err = serde_json::from_str::<Named>(r#"{"id":"a","name":null}"#).unwrap_err();
        assert!(matches!(ModelError::from(err), ModelError::UnexpectedNull { .. }));
    }

    #[test]
    fn other_shape_errors_stay_json() {
        let err = serde_json::from_str::<Named>(r#"{"id":1,"name":"n"}"#).unwrap_err();
        assert!(matches!(ModelError::from(err), ModelError::Json(_)));
    }

    #[test]
    fn non_data_errors_stay_json() {
        let err = serde_json::from_str::<Named>(r#"{"id":"a""#).unwrap_err();
        assert!(matches!(ModelError::from(err), ModelError::Json(_)));
    }

    #[test]
    fn every_union_error_display_is_recognized() {
        let source = || serde_json::from_str::<Named>(r#"{"id":"a"}"#).unwrap_err();
        let errors = [
            UnionError::MissingDiscriminator {
                union: "Price",
                field: "model_type",
            },
            UnionError::UnknownVariant {
                union: "Price",
                field: "model_type",
                value: "mystery".into(),
                expected: &["unit"],
            },
            UnionError::VariantMismatch {
                union: "Price",
                variant: "unit",
                source: source(),
            },
            UnionError::NoVariantMatched {
                union: "Price",
                attempts: vec!["date: not a string".into()],
            },
        ];
        for err in errors {
            let kind = err.kind();
            let rendered: serde_json::Error = serde::de::Error::custom(&err);
            match ModelError::from(rendered) {
                ModelError::Union { kind: got, union, message } => {
                    assert_eq!(got, kind);
                    assert_eq!(union, "Price");
                    assert_eq!(message, err.to_string());
                }
                other => panic!("expected Union for {kind:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn nested_missing_field_stays_with_the_union() {
        let err = UnionError::VariantMismatch {
            union: "Price",
            variant: "unit",
            source: serde_json::from_str::<Named>(r#"{"id":"a"}"#).unwrap_err(),
        };
        let rendered: serde_json::Error = serde::de::Error::custom(err);
        assert!(matches!(
            ModelError::from(rendered),
            ModelError::Union {
                kind: UnionErrorKind::VariantMismatch,
                ..
            }
        ));
    }

    #[test]
    fn plain_messages_with_colons_are_not_unions() {
        let rendered: serde_json::Error = serde::de::Error::custom("price: no variant matched x");
        assert!(matches!(ModelError::from(rendered), ModelError::Json(_)));
    }

    #[test]
    fn unknown_variant_lists_expected_values() {
        let err = UnionError::UnknownVariant {
            union: "Price",
            field: "model_type",
            value: "mystery".into(),
            expected: &["unit", "tiered"],
        };
        assert_eq!(
            err.to_string(),
            "Price: no variant matched model_type=`mystery` (expected one of: unit, tiered)"
        );
    }
}
