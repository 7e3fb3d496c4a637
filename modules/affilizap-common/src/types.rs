use chrono::{DateTime, Local, TimeZone, Utc};
use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Category ---

/// Product niche the copy was written for.
///
/// The model is asked to pick one of the known tags, but its answer is not
/// validated: anything else is kept verbatim as `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Tech,
    Home,
    Beauty,
    Fashion,
    Food,
    Viral,
    #[default]
    Other,
    Unrecognized(String),
}

impl Category {
    pub const KNOWN: [Category; 7] = [
        Category::Tech,
        Category::Home,
        Category::Beauty,
        Category::Fashion,
        Category::Food,
        Category::Viral,
        Category::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Tech => "TECH",
            Category::Home => "HOME",
            Category::Beauty => "BEAUTY",
            Category::Fashion => "FASHION",
            Category::Food => "FOOD",
            Category::Viral => "VIRAL",
            Category::Other => "OTHER",
            Category::Unrecognized(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Unrecognized(_))
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Category::KNOWN
            .into_iter()
            .find(|c| c.as_str() == raw)
            .unwrap_or(Category::Unrecognized(raw))
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        Category::from(raw.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The schema only advertises the known tags.
impl JsonSchema for Category {
    fn schema_name() -> String {
        "Category".to_string()
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            enum_values: Some(
                Category::KNOWN
                    .iter()
                    .map(|c| serde_json::Value::String(c.as_str().to_string()))
                    .collect(),
            ),
            ..Default::default()
        }
        .into()
    }
}

// --- Platform ---

/// Marketplace a product link belongs to. Always derived locally from the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Amazon,
    Shopee,
    MercadoLivre,
    Magalu,
    Aliexpress,
    #[default]
    #[serde(other)]
    Other,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Amazon,
        Platform::Shopee,
        Platform::MercadoLivre,
        Platform::Magalu,
        Platform::Aliexpress,
        Platform::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Amazon => "AMAZON",
            Platform::Shopee => "SHOPEE",
            Platform::MercadoLivre => "MERCADO_LIVRE",
            Platform::Magalu => "MAGALU",
            Platform::Aliexpress => "ALIEXPRESS",
            Platform::Other => "OTHER",
        }
    }

    /// Name shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Amazon => "Amazon",
            Platform::Shopee => "Shopee",
            Platform::MercadoLivre => "Mercado Livre",
            Platform::Magalu => "Magalu",
            Platform::Aliexpress => "AliExpress",
            Platform::Other => "Outros",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    /// Accepts tags in any case, with `-` or `_` separators (`mercado-livre`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

// --- GeneratedCopy ---

/// One generated promotional text plus its metadata.
///
/// Degraded results (`is_error`) share the same shape so every entry is renderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCopy {
    pub id: String,
    #[serde(default)]
    pub original_link: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub platform: Platform,
    /// The user-supplied screenshot, as a data URL. Never persisted locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Product image URL reported by the model. Untrusted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default)]
    pub is_error: bool,
}

impl GeneratedCopy {
    /// Copy of this entry with the screenshot dropped.
    pub fn without_image(&self) -> Self {
        Self {
            image_url: None,
            ..self.clone()
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// `dd/MM, HH:mm` in local time.
    pub fn display_timestamp(&self) -> String {
        self.created_at()
            .map(|t| t.with_timezone(&Local).format("%d/%m, %H:%M").to_string())
            .unwrap_or_default()
    }
}
