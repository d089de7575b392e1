use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use thiserror::Error;
use url::Url;

/// Canonical timestamp format used on the wire: UTC, second precision,
/// literal `Z` suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing value for field {field:?}")]
    MissingField { field: &'static str },
    #[error("field {field:?} is not a valid {expected}: {value:?}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("unsupported value {value:?} for field {field:?}")]
    EnumViolation { field: &'static str, value: String },
    #[error("field {field:?} is not a valid absolute URL: {value:?}")]
    MalformedUrl { field: &'static str, value: String },
}

impl ValidationError {
    /// The field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::EnumViolation { field, .. }
            | ValidationError::MalformedUrl { field, .. } => field,
        }
    }
}

/// Languages supported by the OneFootball Network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    Br,
    De,
    En,
    Es,
    Fr,
    Id,
    It,
    Ko,
    Pt,
    Ru,
}

impl Language {
    /// Parse a locale code, rejecting anything outside the supported set.
    pub fn parse(value: &str) -> Result<Language, ValidationError> {
        Language::from_str(value).map_err(|_| ValidationError::EnumViolation {
            field: "language",
            value: value.to_string(),
        })
    }
}

/// Serde helpers applying [`TIMESTAMP_FORMAT`] to outbound timestamps.
/// Inbound values are accepted in any RFC 3339 form and normalized to UTC.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(super::TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&value)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(value) => DateTime::parse_from_rfc3339(&value)
                    .map(|parsed| Some(parsed.with_timezone(&Utc)))
                    .map_err(de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| ValidationError::WrongType {
            field,
            expected: "RFC 3339 timestamp",
            value: value.to_string(),
        })
}

fn parse_http_url(field: &'static str, value: &str) -> Result<Url, ValidationError> {
    let malformed = || ValidationError::MalformedUrl {
        field,
        value: value.to_string(),
    };
    let url = Url::parse(value).map_err(|_| malformed())?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(malformed());
    }
    Ok(url)
}

fn require<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ValidationError> {
    value.ok_or(ValidationError::MissingField { field })
}

/// Response of the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// A post payload to be published on the network.
///
/// Instances are created through [`NewPost::builder`], which validates every
/// field, so a value of this type is always safe to hand to the network
/// layer. Unset optional fields are omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    external_id: String,
    source_url: Url,
    language: Language,
    #[serde(with = "timestamp")]
    published: DateTime<Utc>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    modified: Option<DateTime<Utc>>,
    title: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    breaking_news: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    draft: Option<bool>,
}

impl NewPost {
    pub fn builder() -> NewPostBuilder {
        NewPostBuilder::new()
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn published(&self) -> DateTime<Utc> {
        self.published
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }

    pub fn image_width(&self) -> Option<u32> {
        self.image_width
    }

    pub fn image_height(&self) -> Option<u32> {
        self.image_height
    }

    pub fn breaking_news(&self) -> Option<bool> {
        self.breaking_news
    }

    pub fn draft(&self) -> Option<bool> {
        self.draft
    }

    /// Serialize to a JSON mapping suitable for an outbound request body.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

pub struct NewPostBuilder {
    external_id: Option<String>,
    source_url: Option<String>,
    language: Option<String>,
    published: Option<String>,
    modified: Option<String>,
    title: Option<String>,
    content: Option<String>,
    image_url: Option<String>,
    image_width: Option<u32>,
    image_height: Option<u32>,
    breaking_news: Option<bool>,
    draft: Option<bool>,
}

impl NewPostBuilder {
    fn new() -> NewPostBuilder {
        NewPostBuilder {
            external_id: None,
            source_url: None,
            language: None,
            published: None,
            modified: None,
            title: None,
            content: None,
            image_url: None,
            image_width: None,
            image_height: None,
            breaking_news: None,
            draft: None,
        }
    }

    pub fn external_id(&mut self, external_id: &str) -> &mut NewPostBuilder {
        self.external_id = Some(external_id.to_string());
        self
    }

    pub fn source_url(&mut self, source_url: &str) -> &mut NewPostBuilder {
        self.source_url = Some(source_url.to_string());
        self
    }

    pub fn language(&mut self, language: &str) -> &mut NewPostBuilder {
        self.language = Some(language.to_string());
        self
    }

    pub fn published(&mut self, published: &str) -> &mut NewPostBuilder {
        self.published = Some(published.to_string());
        self
    }

    pub fn modified(&mut self, modified: &str) -> &mut NewPostBuilder {
        self.modified = Some(modified.to_string());
        self
    }

    pub fn title(&mut self, title: &str) -> &mut NewPostBuilder {
        self.title = Some(title.to_string());
        self
    }

    pub fn content(&mut self, content: &str) -> &mut NewPostBuilder {
        self.content = Some(content.to_string());
        self
    }

    pub fn image_url(&mut self, image_url: &str) -> &mut NewPostBuilder {
        self.image_url = Some(image_url.to_string());
        self
    }

    pub fn image_width(&mut self, image_width: u32) -> &mut NewPostBuilder {
        self.image_width = Some(image_width);
        self
    }

    pub fn image_height(&mut self, image_height: u32) -> &mut NewPostBuilder {
        self.image_height = Some(image_height);
        self
    }

    pub fn breaking_news(&mut self, breaking_news: bool) -> &mut NewPostBuilder {
        self.breaking_news = Some(breaking_news);
        self
    }

    pub fn draft(&mut self, draft: bool) -> &mut NewPostBuilder {
        self.draft = Some(draft);
        self
    }

    /// Validate all collected raw values and assemble the post.
    ///
    /// `draft` defaults to `false` when not set explicitly.
    pub fn build(&self) -> Result<NewPost, ValidationError> {
        let external_id = require(self.external_id.as_deref(), "external_id")?.to_string();
        let source_url =
            parse_http_url("source_url", require(self.source_url.as_deref(), "source_url")?)?;
        let language = Language::parse(require(self.language.as_deref(), "language")?)?;
        let published =
            parse_timestamp("published", require(self.published.as_deref(), "published")?)?;
        let modified = self
            .modified
            .as_deref()
            .map(|value| parse_timestamp("modified", value))
            .transpose()?;
        let title = require(self.title.as_deref(), "title")?.to_string();
        let content = require(self.content.as_deref(), "content")?.to_string();
        let image_url = self
            .image_url
            .as_deref()
            .map(|value| parse_http_url("image_url", value))
            .transpose()?;
        check_image_metadata(image_url.as_ref(), self.image_width, self.image_height, true)?;

        Ok(NewPost {
            external_id,
            source_url,
            language,
            published,
            modified,
            title,
            content,
            image_url,
            image_width: self.image_width,
            image_height: self.image_height,
            breaking_news: self.breaking_news,
            draft: Some(self.draft.unwrap_or(false)),
        })
    }
}

/// Image dimensions come in pairs; a full payload additionally needs the
/// image itself.
fn check_image_metadata(
    image_url: Option<&Url>,
    image_width: Option<u32>,
    image_height: Option<u32>,
    require_url: bool,
) -> Result<(), ValidationError> {
    match (image_width, image_height) {
        (Some(_), None) => {
            return Err(ValidationError::MissingField {
                field: "image_height",
            })
        }
        (None, Some(_)) => {
            return Err(ValidationError::MissingField {
                field: "image_width",
            })
        }
        _ => {}
    }
    if require_url && image_width.is_some() && image_url.is_none() {
        return Err(ValidationError::MissingField { field: "image_url" });
    }
    Ok(())
}

/// A partial update of an existing post.
///
/// Every field is optional and unset fields are omitted from the payload,
/// so the remote system keeps its prior values for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<Language>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    published: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    breaking_news: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    draft: Option<bool>,
}

impl PostUpdate {
    pub fn builder() -> PostUpdateBuilder {
        PostUpdateBuilder::new()
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn source_url(&self) -> Option<&Url> {
        self.source_url.as_ref()
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }

    pub fn image_width(&self) -> Option<u32> {
        self.image_width
    }

    pub fn image_height(&self) -> Option<u32> {
        self.image_height
    }

    pub fn breaking_news(&self) -> Option<bool> {
        self.breaking_news
    }

    pub fn draft(&self) -> Option<bool> {
        self.draft
    }

    /// Serialize to a JSON mapping holding exactly the fields that were set.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

pub struct PostUpdateBuilder {
    external_id: Option<String>,
    source_url: Option<String>,
    language: Option<String>,
    published: Option<String>,
    modified: Option<String>,
    title: Option<String>,
    content: Option<String>,
    image_url: Option<String>,
    image_width: Option<u32>,
    image_height: Option<u32>,
    breaking_news: Option<bool>,
    draft: Option<bool>,
}

impl PostUpdateBuilder {
    fn new() -> PostUpdateBuilder {
        PostUpdateBuilder {
            external_id: None,
            source_url: None,
            language: None,
            published: None,
            modified: None,
            title: None,
            content: None,
            image_url: None,
            image_width: None,
            image_height: None,
            breaking_news: None,
            draft: None,
        }
    }

    pub fn external_id(&mut self, external_id: &str) -> &mut PostUpdateBuilder {
        self.external_id = Some(external_id.to_string());
        self
    }

    pub fn source_url(&mut self, source_url: &str) -> &mut PostUpdateBuilder {
        self.source_url = Some(source_url.to_string());
        self
    }

    pub fn language(&mut self, language: &str) -> &mut PostUpdateBuilder {
        self.language = Some(language.to_string());
        self
    }

    pub fn published(&mut self, published: &str) -> &mut PostUpdateBuilder {
        self.published = Some(published.to_string());
        self
    }

    pub fn modified(&mut self, modified: &str) -> &mut PostUpdateBuilder {
        self.modified = Some(modified.to_string());
        self
    }

    pub fn title(&mut self, title: &str) -> &mut PostUpdateBuilder {
        self.title = Some(title.to_string());
        self
    }

    pub fn content(&mut self, content: &str) -> &mut PostUpdateBuilder {
        self.content = Some(content.to_string());
        self
    }

    pub fn image_url(&mut self, image_url: &str) -> &mut PostUpdateBuilder {
        self.image_url = Some(image_url.to_string());
        self
    }

    pub fn image_width(&mut self, image_width: u32) -> &mut PostUpdateBuilder {
        self.image_width = Some(image_width);
        self
    }

    pub fn image_height(&mut self, image_height: u32) -> &mut PostUpdateBuilder {
        self.image_height = Some(image_height);
        self
    }

    pub fn breaking_news(&mut self, breaking_news: bool) -> &mut PostUpdateBuilder {
        self.breaking_news = Some(breaking_news);
        self
    }

    pub fn draft(&mut self, draft: bool) -> &mut PostUpdateBuilder {
        self.draft = Some(draft);
        self
    }

    /// Validate the fields that were set. No defaults are applied; a field
    /// left unset stays absent from the update.
    pub fn build(&self) -> Result<PostUpdate, ValidationError> {
        let source_url = self
            .source_url
            .as_deref()
            .map(|value| parse_http_url("source_url", value))
            .transpose()?;
        let language = self.language.as_deref().map(Language::parse).transpose()?;
        let published = self
            .published
            .as_deref()
            .map(|value| parse_timestamp("published", value))
            .transpose()?;
        let modified = self
            .modified
            .as_deref()
            .map(|value| parse_timestamp("modified", value))
            .transpose()?;
        let image_url = self
            .image_url
            .as_deref()
            .map(|value| parse_http_url("image_url", value))
            .transpose()?;
        // An update may resize an image already on the post, so the URL is
        // not required alongside the dimensions here.
        check_image_metadata(image_url.as_ref(), self.image_width, self.image_height, false)?;

        Ok(PostUpdate {
            external_id: self.external_id.clone(),
            source_url,
            language,
            published,
            modified,
            title: self.title.clone(),
            content: self.content.clone(),
            image_url,
            image_width: self.image_width,
            image_height: self.image_height,
            breaking_news: self.breaking_news,
            draft: self.draft,
        })
    }
}

/// A post as the remote system reports it: the payload fields plus the
/// remote-assigned id and the `synced` processing flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedPost {
    id: u64,
    synced: bool,
    #[serde(flatten)]
    post: NewPost,
}

impl DetailedPost {
    /// Remote-assigned numeric id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the remote system has finished processing the post.
    pub fn synced(&self) -> bool {
        self.synced
    }

    pub fn post(&self) -> &NewPost {
        &self.post
    }

    /// Construct from a JSON mapping, tolerating unknown fields but
    /// rejecting missing or malformed required ones.
    pub fn from_value(value: serde_json::Value) -> Result<DetailedPost, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// An ordered collection of posts, as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsResponse {
    pub posts: Vec<DetailedPost>,
}
