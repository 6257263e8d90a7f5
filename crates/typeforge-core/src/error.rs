use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Two filter variants being merged disagree on a shared field.
    #[error("Incompatible filter variants '{left}' and '{right}' on field '{field}' ({detail})")]
    SchemaIncompatibility {
        left: String,
        right: String,
        field: String,
        detail: String,
    },

    /// A reference points at a name that is not part of the definition set.
    #[error("Dangling reference: '{from_type}.{field}' refers to unknown '{target}'")]
    DanglingReference {
        from_type: String,
        field: String,
        target: String,
    },

    #[error("Naming collision: '{first}' and '{second}' claim the same name '{name}'")]
    NamingCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration conflict: {0}")]
    ConfigurationConflict(String),

    #[error("Invalid definition set: {0}")]
    InvalidDefinition(String),
}

impl CoreError {
    pub fn dangling(
        from_type: impl Into<String>,
        field: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        CoreError::DanglingReference {
            from_type: from_type.into(),
            field: field.into(),
            target: target.into(),
        }
    }

    pub fn collision(
        name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        CoreError::NamingCollision {
            name: name.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
