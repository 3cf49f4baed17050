use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Record identifier as sent by the API.
///
/// The API emits numeric ids, but string ids are accepted so a record is
/// never dropped just because a backend serializes its key differently.
/// Numeric strings normalize to `Number`, so `"5"` from JSON and `5` from
/// the command line are the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => ItemId::Number(n),
            Raw::Text(s) => ItemId::from_text(&s),
        })
    }
}

impl ItemId {
    fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => ItemId::Number(n),
            Err(_) => ItemId::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for ItemId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ItemId::from_text(s))
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Number(n)
    }
}

/// A price as the API sends it: either a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

/// A catalog product.
///
/// Fields the client does not model are kept in `extra` so a wishlist
/// snapshot round-trips the record the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Affiliate "buy now" link, often missing a scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aff_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Minimal product with only an id and a name.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            price: None,
            discount_price: None,
            image: None,
            description: None,
            category_name: None,
            aff_link: None,
            extra: Map::new(),
        }
    }

    /// Price to show: the discounted one when present.
    pub fn display_price(&self) -> Option<&Amount> {
        self.discount_price.as_ref().or(self.price.as_ref())
    }

    /// Name to show, with a fallback for unnamed records.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Product")
    }

    /// Normalized purchase URL built from `aff_link`.
    pub fn buy_url(&self) -> Option<String> {
        normalize_link(self.aff_link.as_deref()?)
    }
}

/// Make a server-supplied link openable.
///
/// All whitespace is removed and `https://` is prepended when the link
/// carries no scheme. `None` when the link is blank.
pub fn normalize_link(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    if compact.starts_with("http://") || compact.starts_with("https://") {
        Some(compact)
    } else {
        Some(format!("https://{}", compact))
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Store-wide settings: mostly links to informational pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub about_us: Option<String>,
    #[serde(default)]
    pub privacy_policy: Option<String>,
    #[serde(default)]
    pub terms_conditions: Option<String>,
    #[serde(default)]
    pub refund_policy: Option<String>,
    #[serde(default)]
    pub help_center: Option<String>,
    #[serde(default)]
    pub contact_us: Option<String>,
    #[serde(default)]
    pub play_store: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the settings menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsLink {
    pub key: &'static str,
    pub title: &'static str,
    pub url: String,
}

impl AppSettings {
    /// Menu entries in display order, skipping blank links. URLs are
    /// normalized like [`Product::buy_url`].
    pub fn links(&self) -> Vec<SettingsLink> {
        let entries: [(&'static str, &'static str, &Option<String>); 7] = [
            ("about", "About Us", &self.about_us),
            ("privacy", "Privacy Policy", &self.privacy_policy),
            ("terms", "Terms & Conditions", &self.terms_conditions),
            ("refund", "Refund Policy", &self.refund_policy),
            ("help", "Help Center", &self.help_center),
            ("contact", "Contact Us", &self.contact_us),
            ("rate", "Rate this App", &self.play_store),
        ];

        entries
            .into_iter()
            .filter_map(|(key, title, link)| {
                let url = normalize_link(link.as_deref()?)?;
                Some(SettingsLink { key, title, url })
            })
            .collect()
    }
}

/// One fetched batch of records plus opaque pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: Option<Value>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, meta: None }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Filter parameters for `GET /products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_id: Option<ItemId>,
}

impl ProductQuery {
    /// Unfiltered listing.
    pub fn all() -> Self {
        Self::default()
    }

    /// Free-text search; blank text means no search filter.
    pub fn search(text: &str) -> Self {
        Self::default().with_search(text)
    }

    /// Products of one category.
    pub fn category(id: impl Into<ItemId>) -> Self {
        Self {
            search: None,
            category_id: Some(id.into()),
        }
    }

    pub fn with_search(mut self, text: &str) -> Self {
        let trimmed = text.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Query-string pairs for this filter, excluding the page number.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category_id) = &self.category_id {
            params.push(("category_id", category_id.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params
    }
}
