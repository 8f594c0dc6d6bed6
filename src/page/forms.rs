use crate::data_models::{first_validation_message, TrackRequest};
use rust_decimal::Decimal;
use std::str::FromStr;
use validator::Validate;

pub const EMPTY_URL_MESSAGE: &str = "Please enter a product URL.";
pub const INVALID_THRESHOLD_MESSAGE: &str = "Please enter a valid price threshold.";

/// Raw contents of the track inputs, as typed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrackForm {
    pub product_url: String,
    pub price_threshold: String,
}

impl TrackForm {
    pub fn new(product_url: &str, price_threshold: &str) -> Self {
        Self {
            product_url: product_url.to_string(),
            price_threshold: price_threshold.to_string(),
        }
    }

    pub fn clear(&mut self) {
        self.product_url.clear();
        self.price_threshold.clear();
    }

    fn threshold(&self) -> Result<Option<Decimal>, String> {
        let raw = self.price_threshold.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        Decimal::from_str(raw)
            .map(Some)
            .map_err(|_| INVALID_THRESHOLD_MESSAGE.to_string())
    }

    /// The request this form would submit, or the message to alert.
    pub fn to_request(&self) -> Result<TrackRequest, String> {
        let product_url = self.product_url.trim();
        if product_url.is_empty() {
            return Err(EMPTY_URL_MESSAGE.to_string());
        }
        let request = TrackRequest {
            product_url: product_url.to_string(),
            price_threshold: self.threshold()?,
        };
        request
            .validate()
            .map_err(|errors| first_validation_message(&errors))?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_rejected() {
        let form = TrackForm::new("  ", "100");
        assert_eq!(form.to_request().unwrap_err(), EMPTY_URL_MESSAGE.to_string());
    }

    #[test]
    fn empty_threshold_is_none() {
        let form = TrackForm::new("https://example.com/p/1", "");
        let request = form.to_request().expect("Failed to build request");
        assert_eq!(request.price_threshold, None);
    }

    #[test]
    fn numeric_threshold_is_parsed() {
        let form = TrackForm::new("https://example.com/p/1", " 99.5 ");
        let request = form.to_request().expect("Failed to build request");
        assert_eq!(request.price_threshold, Some(Decimal::new(995, 1)));
    }

    #[test]
    fn text_threshold_is_rejected() {
        let form = TrackForm::new("https://example.com/p/1", "cheap");
        assert_eq!(
            form.to_request().unwrap_err(),
            INVALID_THRESHOLD_MESSAGE.to_string()
        );
    }

    #[test]
    fn negative_threshold_is_passed_through() {
        let form = TrackForm::new("https://www.amazon.in/dp/B0X", "-5");
        let request = form.to_request().expect("Failed to build request");
        assert_eq!(request.price_threshold, Some(Decimal::new(-5, 0)));
    }

    #[test]
    fn url_without_scheme_is_accepted() {
        let form = TrackForm::new(" www.amazon.in/dp/B0X ", "");
        let request = form.to_request().expect("Failed to build request");
        assert_eq!(request.product_url, "www.amazon.in/dp/B0X".to_string());
    }

    #[test]
    fn clear_empties_both_inputs() {
        let mut form = TrackForm::new("https://example.com/p/1", "10");
        form.clear();
        assert_eq!(form, TrackForm::default());
    }
}
