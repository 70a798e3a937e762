//! Mapping of [`SearchFilters`] onto engine query parameters.

use device_shots_core::{LicenseFilter, SearchFilters, SizeFilter};

/// Bing's `qft` parameter: concatenated `+filterui:` terms.
///
/// Returns `None` when no filter is set.
pub fn bing_qft(filters: &SearchFilters) -> Option<String> {
    let mut terms = Vec::new();
    if let Some(size) = filters.size {
        terms.push(match size {
            SizeFilter::Small => "+filterui:imagesize-small",
            SizeFilter::Medium => "+filterui:imagesize-medium",
            SizeFilter::Large => "+filterui:imagesize-large",
            SizeFilter::Wallpaper => "+filterui:imagesize-wallpaper",
        });
    }
    if filters.photo_only {
        terms.push("+filterui:photo-photo");
    }
    if let Some(license) = filters.license {
        terms.push(match license {
            LicenseFilter::CreativeCommons => "+filterui:license-L2_L3_L4_L5_L6_L7",
            LicenseFilter::PublicDomain => "+filterui:license-L1",
        });
    }
    if terms.is_empty() {
        None
    } else {
        Some(terms.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters() {
        assert_eq!(
            bing_qft(&SearchFilters::default()).as_deref(),
            Some("+filterui:imagesize-large+filterui:photo-photo+filterui:license-L2_L3_L4_L5_L6_L7")
        );
    }

    #[test]
    fn no_filters() {
        assert_eq!(bing_qft(&SearchFilters::none()), None);
    }

    #[test]
    fn single_filter() {
        let filters = SearchFilters {
            size: Some(SizeFilter::Wallpaper),
            ..SearchFilters::none()
        };
        assert_eq!(bing_qft(&filters).as_deref(), Some("+filterui:imagesize-wallpaper"));
    }
}
