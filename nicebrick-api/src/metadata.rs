//! ERC-721 style token metadata for BearBrick artifacts.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use nicebrick_core::{HexColor, SubjectId};
use serde::{Deserialize, Serialize};

pub const COLLECTION_NAME: &str = "BearBrick Farcaster";
pub const CREATED_BY: &str = "BearBrick Mini App";

/// One `{trait_type, value}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MetadataAttribute {
    pub trait_type: String,
    pub value: String,
}

impl MetadataAttribute {
    fn new(trait_type: &str, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: value.into(),
        }
    }
}

/// Token metadata document. Field names follow the ERC-721 metadata JSON
/// schema, so they stay snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    /// Data URL or hosted image URL.
    pub image: String,
    pub external_url: String,
    pub attributes: Vec<MetadataAttribute>,
    pub created_by: String,
    pub created_at: String,
}

/// Generated metadata plus its `data:application/json;base64` token URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenArtifact {
    pub metadata: TokenMetadata,
    pub token_uri: String,
}

/// Builder for [`TokenMetadata`].
#[derive(Debug, Clone)]
pub struct MetadataBuilder<'a> {
    subject_id: SubjectId,
    label: &'a str,
    image: String,
    external_url: &'a str,
    colors: Option<(&'a HexColor, &'a HexColor)>,
    created_at: DateTime<Utc>,
}

impl<'a> MetadataBuilder<'a> {
    pub fn new(subject_id: SubjectId, label: &'a str, external_url: &'a str) -> Self {
        Self {
            subject_id,
            label,
            image: String::new(),
            external_url,
            colors: None,
            created_at: Utc::now(),
        }
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Include `Primary Color` / `Secondary Color` attributes.
    pub fn colors(mut self, primary: &'a HexColor, secondary: &'a HexColor) -> Self {
        self.colors = Some((primary, secondary));
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn build(self) -> TokenMetadata {
        let mut attributes = vec![
            MetadataAttribute::new("Farcaster ID", self.subject_id.to_string()),
            MetadataAttribute::new("User", self.label),
        ];
        if let Some((primary, secondary)) = self.colors {
            attributes.push(MetadataAttribute::new("Primary Color", primary.as_str()));
            attributes.push(MetadataAttribute::new("Secondary Color", secondary.as_str()));
        }
        attributes.extend([
            MetadataAttribute::new("Collection", COLLECTION_NAME),
            MetadataAttribute::new("Platform", "Farcaster"),
            MetadataAttribute::new("Network", "Base"),
            MetadataAttribute::new("Royalty", "2%"),
        ]);

        TokenMetadata {
            name: format!("{}'s BearBrick", self.label),
            description: format!(
                "A personalized BearBrick NFT generated for {} (FID: {}). This unique BearBrick \
                 features colors sampled from the user's Farcaster avatar, creating a one-of-a-kind \
                 digital collectible that represents their identity in the Farcaster ecosystem.",
                self.label, self.subject_id
            ),
            image: self.image,
            external_url: self.external_url.to_string(),
            attributes,
            created_by: CREATED_BY.to_string(),
            created_at: self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl TokenMetadata {
    /// Encode as `data:application/json;base64,...`.
    pub fn token_uri(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(format!("data:application/json;base64,{}", STANDARD.encode(json)))
    }

    /// Value of the attribute named `trait_type`.
    pub fn attribute(&self, trait_type: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == trait_type)
            .map(|a| a.value.as_str())
    }
}

impl TokenArtifact {
    pub fn new(metadata: TokenMetadata) -> Result<Self, serde_json::Error> {
        let token_uri = metadata.token_uri()?;
        Ok(Self {
            metadata,
            token_uri,
        })
    }
}

/// URL of the hosted image for `subject_id`.
pub fn hosted_image_url(app_url: &str, subject_id: SubjectId, display_name: Option<&str>) -> String {
    let base = format!(
        "{}/api/artifact-image/{}",
        app_url.trim_end_matches('/'),
        subject_id
    );
    match display_name.filter(|n| !n.trim().is_empty()) {
        Some(name) => format!("{}?displayName={}", base, urlencoding::encode(name)),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nicebrick_core::NiceResult;

    fn subject() -> NiceResult<SubjectId> {
        Ok(SubjectId::new(12345)?)
    }

    #[test]
    fn test_metadata_document_shape() -> NiceResult<()> {
        let primary = HexColor::default_primary();
        let secondary = HexColor::default_secondary();
        let at = Utc
            .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .ok_or_else(|| nicebrick_core::ValidationError::missing("created_at"))?;
        let metadata = MetadataBuilder::new(subject()?, "alice", "https://nice.example")
            .image("data:image/svg+xml;base64,AAAA")
            .colors(&primary, &secondary)
            .created_at(at)
            .build();

        assert_eq!(metadata.name, "alice's BearBrick");
        assert!(metadata.description.contains("for alice (FID: 12345)"));
        assert_eq!(metadata.attribute("Farcaster ID"), Some("12345"));
        assert_eq!(metadata.attribute("Primary Color"), Some("#5ab0ff"));
        assert_eq!(metadata.attribute("Secondary Color"), Some("#ff7bfb"));
        assert_eq!(metadata.attribute("Royalty"), Some("2%"));
        assert_eq!(metadata.attributes.len(), 8);
        assert_eq!(metadata.created_by, CREATED_BY);
        assert_eq!(metadata.created_at, "2024-01-01T12:00:00.000Z");
        Ok(())
    }

    #[test]
    fn test_hosted_metadata_has_no_color_attributes() -> NiceResult<()> {
        let metadata = MetadataBuilder::new(subject()?, "FID 12345", "https://nice.example").build();
        assert_eq!(metadata.attributes.len(), 6);
        assert_eq!(metadata.attribute("Primary Color"), None);
        Ok(())
    }

    #[test]
    fn test_token_uri_decodes_to_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let metadata = MetadataBuilder::new(subject()?, "bob", "https://nice.example").build();
        let artifact = TokenArtifact::new(metadata.clone())?;
        let encoded = artifact
            .token_uri
            .strip_prefix("data:application/json;base64,")
            .ok_or("missing data url prefix")?;
        let decoded: TokenMetadata = serde_json::from_slice(&STANDARD.decode(encoded)?)?;
        assert_eq!(decoded, metadata);
        Ok(())
    }

    #[test]
    fn test_hosted_image_url_encodes_label() -> NiceResult<()> {
        let url = hosted_image_url("https://nice.example/", subject()?, Some("Ann & Bo"));
        assert_eq!(
            url,
            "https://nice.example/api/artifact-image/12345?displayName=Ann%20%26%20Bo"
        );
        let url = hosted_image_url("https://nice.example", subject()?, None);
        assert_eq!(url, "https://nice.example/api/artifact-image/12345");
        Ok(())
    }
}
