//! Checkout form validation and the order draft it produces.
//!
//! The checkout form is checked in full before anything is sent to the
//! remote API. A form either becomes an [`OrderDraft`] or yields
//! [`ValidationErrors`] carrying one message per failing field; the caller
//! keeps the submitted [`OrderForm`] so the user can correct and resubmit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Email, EmailError, Phone, PhoneError};

/// Checkout form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Name,
    Tel,
    Address,
    Message,
}

impl Field {
    /// Form input name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Name => "name",
            Self::Tel => "tel",
            Self::Address => "address",
            Self::Message => "message",
        }
    }
}

/// Raw checkout form as submitted.
///
/// Every field defaults to empty so a partially filled form still
/// deserializes and is reported field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tel: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub message: String,
}

/// Recipient block of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: Email,
    pub name: String,
    pub tel: Phone,
    pub address: String,
}

/// A validated order, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub user: Recipient,
    pub message: String,
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("checkout form has {} invalid field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: BTreeMap<Field, &'static str>,
}

impl ValidationErrors {
    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Failing fields and their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.errors.entry(field).or_insert(message);
    }
}

pub mod messages {
    //! User-facing validation messages.

    pub const EMAIL_REQUIRED: &str = "Email 欄位必填";
    pub const EMAIL_FORMAT: &str = "Email 格式錯誤";
    pub const NAME_REQUIRED: &str = "姓名欄位必填";
    pub const TEL_REQUIRED: &str = "電話欄位必填";
    pub const TEL_FORMAT: &str = "電話格式錯誤";
    pub const ADDRESS_REQUIRED: &str = "地址欄位必填";
}

impl OrderForm {
    /// Validate every field and build the order draft.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] with the first failing rule of each
    /// invalid field.
    pub fn validate(&self) -> Result<OrderDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let email = Email::parse(&self.email)
            .map_err(|e| match e {
                EmailError::Empty => errors.insert(Field::Email, messages::EMAIL_REQUIRED),
                EmailError::TooLong { .. } | EmailError::InvalidFormat => {
                    errors.insert(Field::Email, messages::EMAIL_FORMAT);
                }
            })
            .ok();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(Field::Name, messages::NAME_REQUIRED);
        }

        let tel = Phone::parse(&self.tel)
            .map_err(|e| match e {
                PhoneError::Empty => errors.insert(Field::Tel, messages::TEL_REQUIRED),
                PhoneError::InvalidFormat => errors.insert(Field::Tel, messages::TEL_FORMAT),
            })
            .ok();

        let address = self.address.trim();
        if address.is_empty() {
            errors.insert(Field::Address, messages::ADDRESS_REQUIRED);
        }

        match (email, tel) {
            (Some(email), Some(tel)) if errors.is_empty() => Ok(OrderDraft {
                user: Recipient {
                    email,
                    name: name.to_owned(),
                    tel,
                    address: address.to_owned(),
                },
                message: self.message.trim().to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> OrderForm {
        OrderForm {
            email: "a@b.com".to_string(),
            name: "王小明".to_string(),
            tel: "0912345678".to_string(),
            address: "台北市信義區市府路1號".to_string(),
            message: "  請於下午送達 ".to_string(),
        }
    }

    #[test]
    fn test_valid_form_builds_draft() {
        let draft = valid_form().validate().unwrap();
        assert_eq!(draft.user.email.as_str(), "a@b.com");
        assert_eq!(draft.user.tel.as_str(), "0912345678");
        assert_eq!(draft.message, "請於下午送達");
    }

    #[test]
    fn test_empty_address_is_required() {
        let form = OrderForm {
            address: "   ".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Address), Some("地址欄位必填"));
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn test_malformed_email_reports_format() {
        let form = OrderForm {
            email: "not-an-email".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some("Email 格式錯誤"));
    }

    #[test]
    fn test_overlong_email_reports_format() {
        let form = OrderForm {
            email: format!("{}@example.com", "a".repeat(250)),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some(messages::EMAIL_FORMAT));
    }

    #[test]
    fn test_missing_email_reports_required() {
        let form = OrderForm {
            email: String::new(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some("Email 欄位必填"));
    }

    #[test]
    fn test_bad_phone_reports_format() {
        let form = OrderForm {
            tel: "12345".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Tel), Some("電話格式錯誤"));

        let fullwidth = OrderForm {
            tel: "09１２３４５６７８".to_string(),
            ..valid_form()
        };
        let errors = fullwidth.validate().unwrap_err();
        assert_eq!(errors.get(Field::Tel), Some(messages::TEL_FORMAT));
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = OrderForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(
            fields,
            vec![Field::Email, Field::Name, Field::Tel, Field::Address]
        );
        assert_eq!(errors.get(Field::Message), None);
    }

    #[test]
    fn test_draft_serializes_in_wire_shape() {
        let draft = valid_form().validate().unwrap();
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["user"]["email"], "a@b.com");
        assert_eq!(json["user"]["tel"], "0912345678");
        assert_eq!(json["message"], "請於下午送達");
    }
}
