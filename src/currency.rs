// src/currency.rs
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A currency the converter knows how to display and quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

pub const CURRENCIES: [Currency; 16] = [
    Currency { code: "EUR", name: "Euro", flag: "https://flagcdn.com/eu.svg" },
    Currency { code: "USD", name: "Dólar estadounidense", flag: "https://flagcdn.com/us.svg" },
    Currency { code: "VES", name: "Bolívar venezolano", flag: "https://flagcdn.com/ve.svg" },
    Currency { code: "PYG", name: "Guaraní paraguayo", flag: "https://flagcdn.com/py.svg" },
    Currency { code: "ARS", name: "Peso argentino", flag: "https://flagcdn.com/ar.svg" },
    Currency { code: "MXN", name: "Peso mexicano", flag: "https://flagcdn.com/mx.svg" },
    Currency { code: "CLP", name: "Peso chileno", flag: "https://flagcdn.com/cl.svg" },
    Currency { code: "COP", name: "Peso colombiano", flag: "https://flagcdn.com/co.svg" },
    Currency { code: "BRL", name: "Real brasileño", flag: "https://flagcdn.com/br.svg" },
    Currency { code: "GBP", name: "Libra esterlina", flag: "https://flagcdn.com/gb.svg" },
    Currency { code: "JPY", name: "Yen japonés", flag: "https://flagcdn.com/jp.svg" },
    Currency { code: "CAD", name: "Dólar canadiense", flag: "https://flagcdn.com/ca.svg" },
    Currency { code: "AUD", name: "Dólar australiano", flag: "https://flagcdn.com/au.svg" },
    Currency { code: "CHF", name: "Franco suizo", flag: "https://flagcdn.com/ch.svg" },
    Currency { code: "CNY", name: "Yuan chino", flag: "https://flagcdn.com/cn.svg" },
    Currency { code: "SEK", name: "Corona sueca", flag: "https://flagcdn.com/se.svg" },
];

/// Currencies whose amounts are shown without a fractional part.
pub const ZERO_DECIMAL_CODES: [&str; 3] = ["PYG", "VES", "JPY"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

/// A code that is guaranteed to be in [`CURRENCIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(&'static Currency);

impl CurrencyCode {
    pub fn parse(raw: &str) -> Result<Self, UnknownCurrency> {
        let wanted = raw.trim().to_ascii_uppercase();
        CURRENCIES
            .iter()
            .find(|c| c.code == wanted)
            .map(CurrencyCode)
            .ok_or_else(|| UnknownCurrency(raw.trim().to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        self.0.code
    }

    pub fn currency(&self) -> &'static Currency {
        self.0
    }

    pub fn name(&self) -> &'static str {
        self.currency().name
    }

    pub fn flag(&self) -> &'static str {
        self.currency().flag
    }

    pub fn is_zero_decimal(&self) -> bool {
        ZERO_DECIMAL_CODES.contains(&self.0.code)
    }

    pub fn all() -> impl Iterator<Item = CurrencyCode> {
        CURRENCIES.iter().map(CurrencyCode)
    }
}

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::parse(s)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0.code)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.code)
    }
}

/// Display name for a stored code, falling back to the code itself.
pub fn display_name(code: &str) -> String {
    CurrencyCode::parse(code)
        .map(|c| c.name().to_string())
        .unwrap_or_else(|_| code.to_string())
}

/// Flag URL for a stored code, empty when the code is not in the catalog.
pub fn flag_url(code: &str) -> String {
    CurrencyCode::parse(code)
        .map(|c| c.flag().to_string())
        .unwrap_or_default()
}
