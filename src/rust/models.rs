use std::fmt;

static SOCIAL_MEDIA_MODEL: &str = include_str!("../../assets/socialmedia_model.json");

/// Models compiled into the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinModel {
    /// Guesses the platform a short post was written for.
    ///
    /// Classes: Facebook, Instagram, LinkedIn, Reddit, Twitter
    SocialMedia,
}

/// Descriptive metadata for a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub description: String,
}

impl BuiltinModel {
    pub fn all() -> &'static [BuiltinModel] {
        &[BuiltinModel::SocialMedia]
    }

    pub fn get_model_info(&self) -> ModelInfo {
        match self {
            Self::SocialMedia => ModelInfo {
                name: "socialmedia".to_string(),
                description: "Social media platform detector (multinomial Naive Bayes)".to_string(),
            },
        }
    }

    /// The serialized bundle as shipped inside the binary
    pub(crate) fn bundle_json(&self) -> &'static str {
        match self {
            Self::SocialMedia => SOCIAL_MEDIA_MODEL,
        }
    }
}

impl fmt::Display for BuiltinModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_model_info().name)
    }
}
