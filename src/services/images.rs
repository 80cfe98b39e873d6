use crate::config::Config;

/// Derives artwork image URLs from the object store layout.
///
/// Images live at `<base>/<id>.jpg`; the `image_url` carried on the record
/// itself is never used.
#[derive(Debug, Clone)]
pub struct ImageLocator {
    base_url: String,
}

impl ImageLocator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds the S3 virtual-hosted URL for the configured bucket, unless an explicit base is set
    pub fn from_config(config: &Config) -> Self {
        match &config.image_base_url {
            Some(base_url) => Self::new(base_url.as_str()),
            None => Self::new(format!(
                "https://{}.s3.{}.amazonaws.com",
                config.s3_bucket_name, config.aws_region
            )),
        }
    }

    pub fn url_for(&self, artwork_id: &str) -> String {
        format!("{}/{}.jpg", self.base_url, artwork_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bucket_url() {
        let locator = ImageLocator::from_config(&Config::default());
        assert_eq!(
            locator.url_for("abc123"),
            "https://artwork-portfolio-project.s3.eu-north-1.amazonaws.com/abc123.jpg"
        );
    }

    #[test]
    fn test_explicit_base_url() {
        let config = Config {
            image_base_url: Some("http://localhost:9000/art/".to_string()),
            ..Config::default()
        };
        let locator = ImageLocator::from_config(&config);
        assert_eq!(locator.url_for("7"), "http://localhost:9000/art/7.jpg");
    }
}
