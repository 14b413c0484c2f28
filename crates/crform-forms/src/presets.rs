//! Ready-made string field configurations.
//!
//! Each preset is a [`StringConfig`] with a pattern, length bounds, and
//! sometimes a mask. [`FormField`] gets a matching constructor for each one,
//! so `FormField::email()` is shorthand for
//! `FormField::string(StringConfig::email())`.

use std::sync::LazyLock;

use regex::Regex;

use crate::fields::{full_match, FormField, StringConfig};

pub(crate) static INTEGER_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("valid regex"));

pub(crate) static DECIMAL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d*)?$").expect("valid regex"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    full_match(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").expect("valid regex")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| full_match(r"\+\d{11,15}").expect("valid regex"));

static NAME: LazyLock<Regex> =
    LazyLock::new(|| full_match(r"\p{L}[\p{L}\- ']*").expect("valid regex"));

static LOGIN: LazyLock<Regex> =
    LazyLock::new(|| full_match(r"[a-zA-Z][a-zA-Z0-9_.\-]*").expect("valid regex"));

static NO_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| full_match(r"\S+").expect("valid regex"));

static IP: LazyLock<Regex> = LazyLock::new(|| {
    full_match(r"((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)")
        .expect("valid regex")
});

static MAC: LazyLock<Regex> =
    LazyLock::new(|| full_match(r"([0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}").expect("valid regex"));

static COLOR: LazyLock<Regex> =
    LazyLock::new(|| full_match(r"#[0-9A-Fa-f]{6}").expect("valid regex"));

static HASH: LazyLock<Regex> =
    LazyLock::new(|| full_match(r"[0-9A-Fa-f]{32}").expect("valid regex"));

static TIME: LazyLock<Regex> =
    LazyLock::new(|| full_match(r"([01]\d|2[0-3]):[0-5]\d").expect("valid regex"));

impl StringConfig {
    /// An e-mail address.
    pub fn email() -> Self {
        Self::new().regex(EMAIL.clone()).example("user@example.com")
    }

    /// An international phone number, `+` followed by 11 to 15 digits.
    pub fn phone() -> Self {
        Self::new()
            .regex(PHONE.clone())
            .min_length(11)
            .max_length(15)
            .mask("+_______________")
            .return_with_mask(true)
            .example("+79999999999")
    }

    /// A personal name: letters, hyphens, apostrophes, and spaces.
    pub fn name() -> Self {
        Self::new().regex(NAME.clone()).example("Ivan")
    }

    /// A login starting with a Latin letter.
    pub fn login() -> Self {
        Self::new()
            .regex(LOGIN.clone())
            .min_length(3)
            .max_length(32)
            .example("ivan_petrov")
    }

    /// A password of at least eight non-whitespace characters.
    pub fn password() -> Self {
        Self::new()
            .regex(NO_WHITESPACE.clone())
            .min_length(8)
            .max_length(128)
    }

    /// A password of at least six non-whitespace characters.
    pub fn simple_password() -> Self {
        Self::new()
            .regex(NO_WHITESPACE.clone())
            .min_length(6)
            .max_length(128)
    }

    /// A dotted-quad IPv4 address.
    pub fn ip() -> Self {
        Self::new().regex(IP.clone()).example("192.168.0.1")
    }

    /// A colon-separated MAC address.
    pub fn mac() -> Self {
        Self::new()
            .regex(MAC.clone())
            .min_length(12)
            .max_length(12)
            .mask("__:__:__:__:__:__")
            .return_with_mask(true)
            .example("00:1A:2B:3C:4D:5E")
    }

    /// A `#rrggbb` colour.
    pub fn color() -> Self {
        Self::new()
            .regex(COLOR.clone())
            .mask("#______")
            .return_with_mask(true)
            .example("#1E90FF")
    }

    /// A 32-character hexadecimal hash.
    pub fn hash() -> Self {
        Self::new()
            .regex(HASH.clone())
            .example("d41d8cd98f00b204e9800998ecf8427e")
    }

    /// A 24-hour `HH:mm` time. Hours above 23 and minutes above 59 are
    /// clamped while typing.
    pub fn time() -> Self {
        let mut config = Self::new()
            .regex(TIME.clone())
            .mask("__:__")
            .return_with_mask(true)
            .example("10:30");
        config.clamp_time = true;
        config
    }
}

impl FormField {
    /// A required e-mail field.
    pub fn email() -> Self {
        Self::string(StringConfig::email())
    }

    /// A required masked phone field.
    pub fn phone() -> Self {
        Self::string(StringConfig::phone())
    }

    /// A required name field.
    pub fn name() -> Self {
        Self::string(StringConfig::name())
    }

    /// A required login field.
    pub fn login() -> Self {
        Self::string(StringConfig::login())
    }

    /// A required password field.
    pub fn password() -> Self {
        Self::string(StringConfig::password())
    }

    /// A required short password field.
    pub fn simple_password() -> Self {
        Self::string(StringConfig::simple_password())
    }

    /// A required IPv4 field.
    pub fn ip() -> Self {
        Self::string(StringConfig::ip())
    }

    /// A required masked MAC address field.
    pub fn mac() -> Self {
        Self::string(StringConfig::mac())
    }

    /// A required masked colour field.
    pub fn color() -> Self {
        Self::string(StringConfig::color())
    }

    /// A required hash field.
    pub fn hash() -> Self {
        Self::string(StringConfig::hash())
    }

    /// A required masked `HH:mm` field.
    pub fn time() -> Self {
        Self::string(StringConfig::time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crform_core::Value;

    fn check(mut field: FormField, input: &str) -> Option<bool> {
        field.set_value(input).unwrap();
        field.is_valid()
    }

    #[test]
    fn test_email() {
        assert_eq!(check(FormField::email(), "user@example.com"), Some(true));
        assert_eq!(check(FormField::email(), "user@example"), Some(false));
        assert_eq!(check(FormField::email(), "@example.com"), Some(false));
    }

    #[test]
    fn test_email_optional_empty_clears_to_null() {
        let mut field = FormField::email().required(false);
        assert_eq!(field.is_valid(), Some(true));
        field.set_value("").unwrap();
        assert_eq!(field.is_valid(), Some(true));
        assert_eq!(field.value_clear(), Value::Null);
    }

    #[test]
    fn test_phone() {
        let mut field = FormField::phone();
        field.set_value("79999999999").unwrap();
        assert_eq!(field.raw_value(), &Value::from("+79999999999"));
        assert_eq!(field.is_valid(), Some(true));
        assert_eq!(field.value_clear(), Value::from("+79999999999"));

        field.set_value("+7999").unwrap();
        assert_eq!(field.error(), "Minimum length: 11");
    }

    #[test]
    fn test_name() {
        assert_eq!(check(FormField::name(), "Ivan"), Some(true));
        assert_eq!(check(FormField::name(), "Anna-Maria"), Some(true));
        assert_eq!(check(FormField::name(), "Иван"), Some(true));
        assert_eq!(check(FormField::name(), "Ivan123"), Some(false));
        assert_eq!(check(FormField::name(), "-Ivan"), Some(false));
    }

    #[test]
    fn test_login() {
        assert_eq!(check(FormField::login(), "ivan_p"), Some(true));
        assert_eq!(check(FormField::login(), "iv"), Some(false));
        assert_eq!(check(FormField::login(), "1ivan"), Some(false));
    }

    #[test]
    fn test_passwords() {
        assert_eq!(check(FormField::password(), "secret12"), Some(true));
        assert_eq!(check(FormField::password(), "secret1"), Some(false));
        assert_eq!(check(FormField::password(), "secret 123"), Some(false));
        assert_eq!(check(FormField::simple_password(), "secret"), Some(true));
    }

    #[test]
    fn test_ip() {
        assert_eq!(check(FormField::ip(), "192.168.0.1"), Some(true));
        assert_eq!(check(FormField::ip(), "256.1.1.1"), Some(false));
    }

    #[test]
    fn test_mac() {
        let mut field = FormField::mac();
        field.set_value("001A2B3C4D5E").unwrap();
        assert_eq!(field.raw_value(), &Value::from("00:1A:2B:3C:4D:5E"));
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_color() {
        let mut field = FormField::color();
        field.set_value("1e90ff").unwrap();
        assert_eq!(field.raw_value(), &Value::from("#1e90ff"));
        assert_eq!(field.is_valid(), Some(true));
    }

    #[test]
    fn test_hash() {
        assert_eq!(
            check(FormField::hash(), "d41d8cd98f00b204e9800998ecf8427e"),
            Some(true)
        );
        assert_eq!(check(FormField::hash(), "d41d8cd9"), Some(false));
    }

    #[test]
    fn test_time_clamps() {
        let mut field = FormField::time();
        field.set_value("2575").unwrap();
        assert_eq!(field.raw_value(), &Value::from("23:59"));
        assert_eq!(field.is_valid(), Some(true));

        field.set_value("23:5").unwrap();
        assert_eq!(field.raw_value(), &Value::from("23:5"));
        assert_eq!(field.is_valid(), Some(false));
    }

    #[test]
    fn test_shapes() {
        assert!(INTEGER_SHAPE.is_match("-12"));
        assert!(!INTEGER_SHAPE.is_match("1.2"));
        assert!(DECIMAL_SHAPE.is_match("1.25"));
        assert!(DECIMAL_SHAPE.is_match("1."));
        assert!(!DECIMAL_SHAPE.is_match(".5"));
    }
}
