use indexmap::IndexMap;

use super::Listing;

/// Listings grouped by brand, in the order brands were first seen
#[derive(Debug, Default)]
pub struct BrandGroups {
    groups: IndexMap<String, Vec<Listing>>,
}

impl BrandGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, listing: Listing) {
        self.groups
            .entry(listing.brand().to_string())
            .or_default()
            .push(listing);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Listing])> {
        self.groups
            .iter()
            .map(|(brand, listings)| (brand.as_str(), listings.as_slice()))
    }

    pub fn brands(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<Listing> for BrandGroups {
    fn from_iter<I: IntoIterator<Item = Listing>>(iter: I) -> Self {
        let mut groups = Self::new();
        for listing in iter {
            groups.push(listing);
        }
        groups
    }
}
