use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

mod groups;

pub use groups::BrandGroups;

/// Brand used when the listing page gives no usable title
pub const UNKNOWN_BRAND: &str = "Unknown";

/// Maximum number of photos kept per listing (3x3 grid)
pub const MAX_IMAGES: usize = 9;

/// Values as pulled off a detail page, before normalization.
///
/// Every field is optional in spirit: empty strings mean "not found".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawListing {
    pub id: Option<String>,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub price: String,
    pub mileage: String,
    pub gear: String,
    pub engine: String,
    pub drive: String,
    pub paint: String,
    pub fuel: String,
    pub opening_price: String,
    pub image_urls: Vec<String>,
    pub source_url: String,
}

impl RawListing {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            ..Default::default()
        }
    }

    /// Normalize into an immutable [`Listing`].
    ///
    /// This never fails: missing values become empty strings, an empty brand
    /// becomes [`UNKNOWN_BRAND`], relative image links are resolved against
    /// `source_url` (and dropped if they cannot be), duplicates are removed
    /// keeping first occurrence, and the list is capped at [`MAX_IMAGES`].
    pub fn normalize(self) -> Listing {
        let base = Url::parse(self.source_url.trim()).ok();

        let id = self
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| id_from_url(&self.source_url));

        let brand = match self.brand.trim() {
            "" => UNKNOWN_BRAND.to_string(),
            b => b.to_string(),
        };

        let mut seen = HashSet::new();
        let image_urls: Vec<String> = self
            .image_urls
            .iter()
            .filter_map(|raw| absolutize(base.as_ref(), raw))
            .filter(|u| seen.insert(u.clone()))
            .take(MAX_IMAGES)
            .collect();
        let image_count = image_urls.len();

        Listing {
            id,
            brand,
            model: clean(self.model),
            year: clean(self.year),
            price: clean(self.price),
            mileage: clean(self.mileage),
            gear: clean(self.gear),
            engine: clean(self.engine),
            drive: clean(self.drive),
            paint: clean(self.paint),
            fuel: clean(self.fuel),
            opening_price: clean(self.opening_price),
            image_urls,
            image_count,
            source_url: self.source_url.trim().to_string(),
        }
    }
}

/// One vehicle listing, ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    id: String,
    brand: String,
    model: String,
    year: String,
    price: String,
    mileage: String,
    gear: String,
    engine: String,
    drive: String,
    paint: String,
    fuel: String,
    opening_price: String,
    image_urls: Vec<String>,
    image_count: usize,
    source_url: String,
}

impl Listing {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn mileage(&self) -> &str {
        &self.mileage
    }

    /// Transmission
    pub fn gear(&self) -> &str {
        &self.gear
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn drive(&self) -> &str {
        &self.drive
    }

    /// Body paint / damage status (RX, RW, X, W...)
    pub fn paint(&self) -> &str {
        &self.paint
    }

    pub fn fuel(&self) -> &str {
        &self.fuel
    }

    pub fn opening_price(&self) -> &str {
        &self.opening_price
    }

    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

fn clean(value: String) -> String {
    value.trim().to_string()
}

/// Last non-empty path segment of a URL, or the input itself when it has none
pub fn id_from_url(url: &str) -> String {
    let trimmed = url.trim();
    let segment = match Url::parse(trimmed) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string),
        Err(_) => trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string),
    };

    match segment {
        Some(s) => s,
        None if !trimmed.is_empty() => trimmed.to_string(),
        None => "unknown".to_string(),
    }
}

fn absolutize(base: Option<&Url>, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Absolute links are kept verbatim so duplicates compare as written
    match Url::parse(raw) {
        Ok(url) => is_web(&url).then(|| raw.to_string()),
        Err(_) => {
            let resolved = base?.join(raw).ok()?;
            is_web(&resolved).then(|| resolved.to_string())
        }
    }
}

fn is_web(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_brand_falls_back_to_unknown() {
        let listing = RawListing::new("https://fem.encar.com/cars/detail/1").normalize();
        assert_eq!(listing.brand(), UNKNOWN_BRAND);

        let mut raw = RawListing::new("https://fem.encar.com/cars/detail/1");
        raw.brand = "   ".to_string();
        assert_eq!(raw.normalize().brand(), UNKNOWN_BRAND);
    }

    #[test]
    fn id_is_derived_from_last_path_segment() {
        let listing = RawListing::new("https://fem.encar.com/cars/detail/39509415").normalize();
        assert_eq!(listing.id(), "39509415");

        let listing = RawListing::new("https://fem.encar.com/cars/detail/39509415/").normalize();
        assert_eq!(listing.id(), "39509415");

        let mut raw = RawListing::new("https://fem.encar.com/cars/detail/1");
        raw.id = Some("777".to_string());
        assert_eq!(raw.normalize().id(), "777");
    }

    #[test]
    fn images_are_deduplicated_and_capped() {
        let mut raw = RawListing::new("https://fem.encar.com/cars/detail/1");
        raw.image_urls = (0..20)
            .map(|i| format!("https://img.encar.com/{}.jpg", i % 12))
            .collect();

        let listing = raw.normalize();
        assert_eq!(listing.image_urls().len(), MAX_IMAGES);
        assert_eq!(listing.image_count(), MAX_IMAGES);

        let unique: HashSet<_> = listing.image_urls().iter().collect();
        assert_eq!(unique.len(), listing.image_urls().len());
        assert_eq!(listing.image_urls()[0], "https://img.encar.com/0.jpg");
        assert_eq!(listing.image_urls()[8], "https://img.encar.com/8.jpg");
    }

    #[test]
    fn relative_images_are_resolved_against_the_page() {
        let mut raw = RawListing::new("https://fem.encar.com/cars/detail/1");
        raw.image_urls = vec![
            "/carpicture/a.jpg".to_string(),
            "https://fem.encar.com/carpicture/a.jpg".to_string(),
            "data:image/png;base64,AAAA".to_string(),
            "".to_string(),
        ];

        let listing = raw.normalize();
        assert_eq!(
            listing.image_urls(),
            &["https://fem.encar.com/carpicture/a.jpg".to_string()]
        );
        assert_eq!(listing.image_count(), 1);
    }

    #[test]
    fn absolute_images_are_deduplicated_as_written() {
        let mut raw = RawListing::new("https://fem.encar.com/cars/detail/1");
        raw.image_urls = vec![
            "https://img.encar.com/a b.jpg".to_string(),
            "https://img.encar.com/a%20b.jpg".to_string(),
            " https://img.encar.com/a b.jpg ".to_string(),
        ];

        let listing = raw.normalize();
        assert_eq!(
            listing.image_urls(),
            &[
                "https://img.encar.com/a b.jpg".to_string(),
                "https://img.encar.com/a%20b.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn relative_images_without_base_are_dropped() {
        let mut raw = RawListing::new("not a url");
        raw.image_urls = vec!["/a.jpg".to_string()];
        assert!(raw.normalize().image_urls().is_empty());
    }

    #[test]
    fn fields_are_trimmed_and_missing_ones_stay_empty() {
        let mut raw = RawListing::new("https://fem.encar.com/cars/detail/1");
        raw.model = "  Sonata ".to_string();
        let listing = raw.normalize();
        assert_eq!(listing.model(), "Sonata");
        assert_eq!(listing.fuel(), "");
        assert_eq!(listing.opening_price(), "");
    }
}
