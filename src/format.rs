//! Currency formatting.
//!
//! A [`CurrencyFormatter`] is built once from explicit [`FormatOptions`] and
//! handed to whatever renders amounts.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// 1,234,567
    Thousands,
    /// 12,34,567
    Indian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPlacement {
    Prefix,
    /// Symbol after the number, separated by a no-break space.
    Suffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    EnUs,
    EnGb,
    EnIn,
    DeDe,
    FrFr,
    JaJp,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::EnGb => "en-GB",
            Locale::EnIn => "en-IN",
            Locale::DeDe => "de-DE",
            Locale::FrFr => "fr-FR",
            Locale::JaJp => "ja-JP",
        }
    }

    fn group_separator(&self) -> char {
        match self {
            Locale::DeDe => '.',
            Locale::FrFr => NARROW_NBSP,
            _ => ',',
        }
    }

    fn decimal_separator(&self) -> char {
        match self {
            Locale::DeDe | Locale::FrFr => ',',
            _ => '.',
        }
    }

    fn grouping(&self) -> Grouping {
        match self {
            Locale::EnIn => Grouping::Indian,
            _ => Grouping::Thousands,
        }
    }

    fn placement(&self) -> SymbolPlacement {
        match self {
            Locale::DeDe | Locale::FrFr => SymbolPlacement::Suffix,
            _ => SymbolPlacement::Prefix,
        }
    }

    /// Host locale from `LC_ALL`, `LC_MONETARY` then `LANG`, falling back to
    /// `en-US`.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for name in ["LC_ALL", "LC_MONETARY", "LANG"] {
            let Some(value) = lookup(name).filter(|v| !v.is_empty()) else {
                continue;
            };
            match value.parse() {
                Ok(locale) => return locale,
                Err(_) => log::debug!("ignoring {name}={value:?}"),
            }
        }
        Locale::default()
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    /// Accepts `en-US`, `en_US.UTF-8`, `de` and similar.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .replace('_', "-")
            .to_ascii_lowercase();
        let mut parts = tag.split('-');
        let language = parts.next().unwrap_or_default();
        let region = parts.next().unwrap_or_default();

        match (language, region) {
            ("en", "gb") => Ok(Locale::EnGb),
            ("en", "in") => Ok(Locale::EnIn),
            ("en", _) => Ok(Locale::EnUs),
            ("de", _) => Ok(Locale::DeDe),
            ("fr", _) => Ok(Locale::FrFr),
            ("ja", _) => Ok(Locale::JaJp),
            _ => Err(ConfigError::UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Inr,
    Chf,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Inr => "INR",
            Currency::Chf => "CHF",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Inr => "₹",
            Currency::Chf => "CHF",
        }
    }

    pub fn minor_digits(&self) -> usize {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }
}

impl FromStr for Currency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            "INR" => Ok(Currency::Inr),
            "CHF" => Ok(Currency::Chf),
            _ => Err(ConfigError::UnknownCurrency(s.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub locale: Locale,
    pub currency: Currency,
}

#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    options: FormatOptions,
}

impl CurrencyFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> FormatOptions {
        self.options
    }

    /// Formats `amount` rounded to the currency's minor unit.
    ///
    /// `NaN` and infinities still render (`$NaN`, `$∞`) so a degenerate
    /// amount can be displayed rather than dropped.
    pub fn format(&self, amount: f64) -> String {
        let locale = self.options.locale;
        let digits = self.options.currency.minor_digits();

        let (negative, number) = if amount.is_nan() {
            (false, "NaN".to_string())
        } else if amount.is_infinite() {
            (amount < 0.0, "∞".to_string())
        } else {
            let rounded = format!("{:.*}", digits, round_half_away(amount.abs(), digits));
            (amount.is_sign_negative(), localize(&rounded, locale))
        };

        let sign = if negative { "-" } else { "" };
        let symbol = self.options.currency.symbol();
        match locale.placement() {
            SymbolPlacement::Prefix if symbol.ends_with(char::is_alphabetic) => {
                format!("{sign}{symbol}{NBSP}{number}")
            }
            SymbolPlacement::Prefix => format!("{sign}{symbol}{number}"),
            SymbolPlacement::Suffix => format!("{sign}{number}{NBSP}{symbol}"),
        }
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

/// Moves an exact tie such as `2.125` up to `2.13` so the fixed-point
/// formatting that follows does not round it to even. Only exact ties move:
/// the fused multiply-add checks that `abs * scale` lost nothing.
fn round_half_away(abs: f64, digits: usize) -> f64 {
    let scale = 10f64.powi(digits as i32);
    let scaled = abs * scale;
    let exact_tie = scaled.fract() == 0.5 && abs.mul_add(scale, -scaled) == 0.0;
    if exact_tie {
        (scaled + 0.5) / scale
    } else {
        abs
    }
}

/// Rewrites a plain `1234567.89` string with the locale's separators.
fn localize(plain: &str, locale: Locale) -> String {
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain, None),
    };

    let mut out = group_digits(int_part, locale.group_separator(), locale.grouping());
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator());
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str, separator: char, grouping: Grouping) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 2);
    for (i, c) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && needs_separator(remaining, grouping) {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Whether a separator goes before a digit with `remaining` digits left,
/// itself included.
fn needs_separator(remaining: usize, grouping: Grouping) -> bool {
    match grouping {
        Grouping::Thousands => remaining % 3 == 0,
        Grouping::Indian => remaining == 3 || (remaining > 3 && remaining % 2 == 1),
    }
}
