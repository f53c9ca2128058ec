//! HTML form payloads and their validation.
//!
//! Each form deserializes leniently (missing fields become empty strings) and
//! validates into domain types. Failures come back as [`FieldErrors`] and are
//! rendered inline next to the offending input; they never become an
//! `AppError`.

use serde::Deserialize;

use bookshop_core::{
    CheckoutDetails, Email, PaymentCard, PaymentCardError, ShippingAddress, Username,
};

/// Per-field validation messages, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(&'static str, String)>,
}

impl FieldErrors {
    /// Record a message against a field.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    /// First message recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Password length bounds, in characters.
const PASSWORD_LENGTH: std::ops::RangeInclusive<usize> = 6..=16;

/// Registration form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// A registration that passed field validation.
#[derive(Debug)]
pub struct Registration {
    pub username: Username,
    pub email: Email,
    pub password: String,
}

impl RegisterForm {
    /// Validate every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns the messages for each invalid field.
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::default();

        let username = Username::parse(&self.username)
            .map_err(|e| errors.add("username", e.to_string()))
            .ok();
        let email = Email::parse(&self.email)
            .map_err(|e| errors.add("email", e.to_string()))
            .ok();

        if self.password.is_empty() {
            errors.add("password", "A password is required!");
        } else if !PASSWORD_LENGTH.contains(&self.password.chars().count()) {
            errors.add(
                "password",
                "Your password should be between 6 and 16 characters long.",
            );
        }

        if self.confirm_password.is_empty() {
            errors.add("confirm_password", "Please confirm password");
        } else if self.confirm_password != self.password {
            errors.add("confirm_password", "Passwords must match.");
        }

        match (username, email) {
            (Some(username), Some(email)) => errors.into_result(|| Registration {
                username,
                email,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Login form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Validate the email format and that a password was given.
    ///
    /// # Errors
    ///
    /// Returns the messages for each invalid field.
    pub fn validate(&self) -> Result<Email, FieldErrors> {
        let mut errors = FieldErrors::default();

        let email = Email::parse(&self.email)
            .map_err(|e| errors.add("email", e.to_string()))
            .ok();
        if self.password.is_empty() {
            errors.add("password", "A password is required!");
        }

        match email {
            Some(email) => errors.into_result(|| email),
            None => Err(errors),
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Postcode length bounds, in characters.
const POSTCODE_LENGTH: std::ops::RangeInclusive<usize> = 6..=16;

/// Checkout form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub ship_name: String,
    pub ship_street: String,
    pub ship_town: String,
    pub ship_postcode: String,
    pub card_number: String,
    pub card_ccv: String,
}

impl CheckoutForm {
    /// Validate the shipping address and card fields.
    ///
    /// # Errors
    ///
    /// Returns the messages for each invalid field.
    pub fn validate(&self) -> Result<CheckoutDetails, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = required(&mut errors, "ship_name", &self.ship_name, "Your name is required");
        let street = required(&mut errors, "ship_street", &self.ship_street, REQUIRED);
        let town = required(&mut errors, "ship_town", &self.ship_town, REQUIRED);
        let postcode = required(&mut errors, "ship_postcode", &self.ship_postcode, REQUIRED);
        if !postcode.is_empty() && !POSTCODE_LENGTH.contains(&postcode.chars().count()) {
            errors.add("ship_postcode", "Post Codes are 6-16 characters long");
        }

        let number = parse_number::<u64>(&mut errors, "card_number", &self.card_number);
        let ccv = parse_number::<u16>(&mut errors, "card_ccv", &self.card_ccv);

        let card = match (number, ccv) {
            (Some(number), Some(ccv)) => match PaymentCard::new(number, ccv) {
                Ok(card) => Some(card),
                Err(e @ PaymentCardError::Number) => {
                    errors.add("card_number", e.to_string());
                    None
                }
                Err(e @ PaymentCardError::Ccv) => {
                    errors.add("card_ccv", e.to_string());
                    None
                }
            },
            _ => None,
        };

        match card {
            Some(card) => errors.into_result(|| CheckoutDetails {
                address: ShippingAddress {
                    name: name.to_owned(),
                    street: street.to_owned(),
                    town: town.to_owned(),
                    postcode: postcode.to_owned(),
                },
                card,
            }),
            None => Err(errors),
        }
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// Longest review `review.content` can hold.
const REVIEW_MAX_CHARS: usize = 5000;

/// Review form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub star_rating: String,
    pub content: String,
}

/// A review that passed field validation.
#[derive(Debug, PartialEq, Eq)]
pub struct ReviewInput {
    pub star_rating: i32,
    pub content: String,
}

impl ReviewForm {
    /// Validate the rating (1-5) and that some content was written.
    ///
    /// # Errors
    ///
    /// Returns the messages for each invalid field.
    pub fn validate(&self) -> Result<ReviewInput, FieldErrors> {
        let mut errors = FieldErrors::default();

        let rating = self.star_rating.trim();
        let star_rating = if rating.is_empty() {
            errors.add("star_rating", "Please award a star-rating");
            None
        } else {
            match rating.parse::<i32>() {
                Ok(n) if (1..=5).contains(&n) => Some(n),
                _ => {
                    errors.add("star_rating", "Not a valid choice.");
                    None
                }
            }
        };

        let content = required(
            &mut errors,
            "content",
            &self.content,
            "Please enter a review of the item",
        );
        if content.chars().count() > REVIEW_MAX_CHARS {
            errors.add("content", "Your review should be at most 5000 characters long.");
        }

        match star_rating {
            Some(star_rating) => errors.into_result(|| ReviewInput {
                star_rating,
                content: content.to_owned(),
            }),
            None => Err(errors),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

const REQUIRED: &str = "This field is required.";

/// Trimmed value, recording `message` when it is blank.
fn required<'v>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &'v str,
    message: &str,
) -> &'v str {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, message);
    }
    value
}

fn parse_number<T: std::str::FromStr>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    value.parse().map_or_else(
        |_| {
            errors.add(field, "Not a valid integer value.");
            None
        },
        Some,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registration() -> RegisterForm {
        RegisterForm {
            username: "reader01".to_string(),
            email: "reader@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        }
    }

    fn checkout() -> CheckoutForm {
        CheckoutForm {
            ship_name: "Ada Lovelace".to_string(),
            ship_street: "1 Analytical Way".to_string(),
            ship_town: "London".to_string(),
            ship_postcode: "SW1A 1AA".to_string(),
            card_number: "4242424242424242".to_string(),
            card_ccv: "42".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        let reg = registration().validate().unwrap();
        assert_eq!(reg.username.as_str(), "reader01");
        assert_eq!(reg.email.as_str(), "reader@example.com");
    }

    #[test]
    fn test_registration_collects_every_failure() {
        let form = RegisterForm {
            username: "abc".to_string(),
            email: "not-an-email".to_string(),
            password: "12345".to_string(),
            confirm_password: "54321".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("username"),
            Some("Must be between 5 to 15 characters!")
        );
        assert_eq!(errors.get("email"), Some("Invalid email address."));
        assert!(errors.get("password").unwrap().contains("between 6 and 16"));
        assert_eq!(errors.get("confirm_password"), Some("Passwords must match."));
    }

    #[test]
    fn test_registration_password_too_long() {
        let mut form = registration();
        form.password = "a".repeat(17);
        form.confirm_password = form.password.clone();
        let errors = form.validate().unwrap_err();
        assert!(errors.get("password").is_some());
        assert!(errors.get("username").is_none());
    }

    #[test]
    fn test_login_requires_password() {
        let form = LoginForm {
            email: "reader@example.com".to_string(),
            password: String::new(),
        };
        assert_eq!(
            form.validate().unwrap_err().get("password"),
            Some("A password is required!")
        );
    }

    #[test]
    fn test_valid_checkout() {
        let details = checkout().validate().unwrap();
        assert_eq!(
            details.address.ship_to(),
            "Ada Lovelace, 1 Analytical Way, London, SW1A 1AA"
        );
        assert_eq!(details.card.reference(), "4242424242424242, 042");
    }

    #[test]
    fn test_checkout_postcode_length() {
        let mut form = checkout();
        form.ship_postcode = "SW1".to_string();
        assert_eq!(
            form.validate().unwrap_err().get("ship_postcode"),
            Some("Post Codes are 6-16 characters long")
        );
    }

    #[test]
    fn test_checkout_card_ranges() {
        let mut form = checkout();
        form.card_number = "10000000000000000".to_string();
        form.card_ccv = "0".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("card_number"),
            Some("Card Number are 16 characters long")
        );

        let mut form = checkout();
        form.card_ccv = "1000".to_string();
        assert_eq!(
            form.validate().unwrap_err().get("card_ccv"),
            Some("CCV are 3 characters long")
        );
    }

    #[test]
    fn test_checkout_non_numeric_card() {
        let mut form = checkout();
        form.card_number = "4242-4242".to_string();
        assert_eq!(
            form.validate().unwrap_err().get("card_number"),
            Some("Not a valid integer value.")
        );
    }

    #[test]
    fn test_checkout_blank_fields() {
        let errors = CheckoutForm::default().validate().unwrap_err();
        assert_eq!(errors.get("ship_name"), Some("Your name is required"));
        assert_eq!(errors.get("ship_town"), Some(REQUIRED));
        assert_eq!(errors.get("card_ccv"), Some(REQUIRED));
    }

    #[test]
    fn test_review_validation() {
        let form = ReviewForm {
            star_rating: "4".to_string(),
            content: " Loved it ".to_string(),
        };
        assert_eq!(
            form.validate().unwrap(),
            ReviewInput {
                star_rating: 4,
                content: "Loved it".to_string()
            }
        );

        let form = ReviewForm {
            star_rating: "6".to_string(),
            content: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("star_rating"), Some("Not a valid choice."));
        assert_eq!(
            errors.get("content"),
            Some("Please enter a review of the item")
        );
    }

    #[test]
    fn test_review_content_fits_column() {
        let form = |content: String| ReviewForm {
            star_rating: "4".to_string(),
            content,
        };

        assert!(form("é".repeat(5000)).validate().is_ok());

        let errors = form("x".repeat(6000)).validate().unwrap_err();
        assert_eq!(
            errors.get("content"),
            Some("Your review should be at most 5000 characters long.")
        );
        assert_eq!(errors.get("star_rating"), None);
    }
}
