//! Currency codes and amounts in minor units.
//!
//! The commerce API reports amounts in major units (`120` means 120 euros)
//! next to a lowercase ISO 4217 code. Both are normalized once at the API
//! boundary, so every comparison the storefront makes is an integer
//! comparison between amounts of the same currency.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// ISO 4217 codes whose minor unit has no decimals.
const ZERO_DECIMAL: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

/// ISO 4217 codes whose minor unit has three decimals.
const THREE_DECIMAL: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// An ISO 4217 currency code, stored uppercase.
///
/// Any three-letter alphabetic code is accepted: a region may sell in a
/// currency the storefront has no formatting rules for. Only presentation
/// depends on the code (exponent and symbol), never price matching.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub const EUR: Currency = Currency(*b"EUR");
    pub const USD: Currency = Currency(*b"USD");
    pub const GBP: Currency = Currency(*b"GBP");
    pub const DKK: Currency = Currency(*b"DKK");
    pub const JPY: Currency = Currency(*b"JPY");

    /// Parse a code in any case, e.g. the API's `"eur"`.
    ///
    /// ```
    /// use shop_commerce::Currency;
    /// assert_eq!(Currency::parse("pln").unwrap().code(), "PLN");
    /// assert!(Currency::parse("euro").is_err());
    /// ```
    pub fn parse(code: &str) -> Result<Self, CommerceError> {
        match code.trim().as_bytes() {
            &[a, b, c] if [a, b, c].iter().all(u8::is_ascii_alphabetic) => Ok(Self([
                a.to_ascii_uppercase(),
                b.to_ascii_uppercase(),
                c.to_ascii_uppercase(),
            ])),
            _ => Err(CommerceError::InvalidCurrency(code.to_string())),
        }
    }

    /// Like [`parse`](Self::parse), discarding the error.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::parse(code).ok()
    }

    /// The uppercase code, e.g. `"EUR"`.
    pub fn code(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("XXX")
    }

    /// Number of decimals in the minor unit.
    pub fn exponent(&self) -> u32 {
        let code = self.code();
        if ZERO_DECIMAL.contains(&code) {
            0
        } else if THREE_DECIMAL.contains(&code) {
            3
        } else {
            2
        }
    }

    /// Prefix symbol for currencies that have an unambiguous one.
    pub fn symbol(&self) -> Option<&'static str> {
        match &self.0 {
            b"EUR" => Some("\u{20ac}"),
            b"USD" => Some("$"),
            b"GBP" => Some("\u{00a3}"),
            b"JPY" => Some("\u{00a5}"),
            _ => None,
        }
    }

    fn scale(&self) -> i64 {
        10_i64.pow(self.exponent())
    }
}

/// The storefront's home currency, used for prices that carry none.
impl Default for Currency {
    fn default() -> Self {
        Currency::EUR
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Currency").field(&self.code()).finish()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for Currency {
    type Error = CommerceError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::parse(&code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

/// An amount in the minor unit of its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units (cents for EUR, yen for JPY).
    pub minor: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// Convert an API amount in major units, rounding to the nearest minor unit.
    ///
    /// ```
    /// use shop_commerce::{Currency, Money};
    /// assert_eq!(Money::from_major(49.99, Currency::EUR).minor, 4999);
    /// assert_eq!(Money::from_major(1200.0, Currency::JPY).minor, 1200);
    /// ```
    pub fn from_major(amount: f64, currency: Currency) -> Self {
        let minor = (amount * currency.scale() as f64).round() as i64;
        Self::new(minor, currency)
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }

    pub fn is_positive(&self) -> bool {
        self.minor > 0
    }

    /// Sum of two amounts; `None` on a currency mismatch or overflow.
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        self.same_currency(other)?;
        self.minor
            .checked_add(other.minor)
            .map(|minor| Money::new(minor, self.currency))
    }

    /// Difference of two amounts; `None` on a currency mismatch or overflow.
    pub fn checked_sub(&self, other: &Money) -> Option<Money> {
        self.same_currency(other)?;
        self.minor
            .checked_sub(other.minor)
            .map(|minor| Money::new(minor, self.currency))
    }

    /// Amount times a quantity; `None` on overflow.
    pub fn checked_mul(&self, quantity: i64) -> Option<Money> {
        self.minor
            .checked_mul(quantity)
            .map(|minor| Money::new(minor, self.currency))
    }

    /// Major-unit digits without symbol or code, e.g. `"1200.00"`.
    pub fn amount_string(&self) -> String {
        let exponent = self.currency.exponent() as usize;
        let scale = self.currency.scale().unsigned_abs();
        let sign = if self.minor < 0 { "-" } else { "" };
        let magnitude = self.minor.unsigned_abs();
        if exponent == 0 {
            return format!("{}{}", sign, magnitude);
        }
        format!(
            "{}{}.{:0width$}",
            sign,
            magnitude / scale,
            magnitude % scale,
            width = exponent
        )
    }

    /// Shopper-facing form: `"€49.99"`, or `"49.99 PLN"` without a symbol.
    pub fn display(&self) -> String {
        match self.currency.symbol() {
            Some(symbol) => format!("{}{}", symbol, self.amount_string()),
            None => format!("{} {}", self.amount_string(), self.currency),
        }
    }

    fn same_currency(&self, other: &Money) -> Option<()> {
        (self.currency == other.currency).then_some(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
