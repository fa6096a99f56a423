//! # Physical Units and Quantities
//!
//! A small dimensional-analysis layer used by the importer, exporter and
//! validator. Units are parsed from the textual expressions found in ReSpecTh
//! and ChemKED files (`"kelvin"`, `"Torr"`, `"1/ms"`, `"cm**3"`, `"meter^3"`)
//! into a scale factor relative to SI base units plus a dimension vector.
//!
//! ## Supported Syntax
//!
//! - Products and quotients: `kg*m/s**2`, `N m`, `1.0 / second`
//! - Exponents: `**n`, `^n`, or trailing digits (`cm3`)
//! - SI prefixes on prefixable units, both symbols (`ms`, `kPa`) and names
//!   (`millisecond`)
//! - Offset temperature scales (`degC`, `degF`) when used on their own

mod error;
mod registry;

#[cfg(test)]
mod tests;

use std::fmt;

pub use error::UnitError;

/// Exponents of the base dimensions (length, mass, time, temperature, amount)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension([i8; 5]);

impl Dimension {
    /// Dimensionless
    pub const NONE: Dimension = Dimension([0; 5]);
    /// Length (meter)
    pub const LENGTH: Dimension = Dimension::new(1, 0, 0, 0, 0);
    /// Mass (kilogram)
    pub const MASS: Dimension = Dimension::new(0, 1, 0, 0, 0);
    /// Time (second)
    pub const TIME: Dimension = Dimension::new(0, 0, 1, 0, 0);
    /// Temperature (kelvin)
    pub const TEMPERATURE: Dimension = Dimension::new(0, 0, 0, 1, 0);
    /// Amount of substance (mole)
    pub const AMOUNT: Dimension = Dimension::new(0, 0, 0, 0, 1);

    /// Build a dimension from its base exponents
    pub const fn new(length: i8, mass: i8, time: i8, temperature: i8, amount: i8) -> Self {
        Dimension([length, mass, time, temperature, amount])
    }

    /// Raise every exponent to an integer power, for constant tables
    pub const fn powi(self, n: i8) -> Self {
        let d = self.0;
        Dimension([d[0] * n, d[1] * n, d[2] * n, d[3] * n, d[4] * n])
    }

    /// Raise every exponent to an integer power; `None` if an exponent
    /// leaves the `i8` range
    pub fn checked_powi(self, n: i8) -> Option<Self> {
        let mut out = self.0;
        for e in out.iter_mut() {
            *e = e.checked_mul(n)?;
        }
        Some(Dimension(out))
    }

    fn checked_mul(self, other: Dimension) -> Option<Self> {
        let mut out = self.0;
        for (o, e) in out.iter_mut().zip(other.0) {
            *o = o.checked_add(e)?;
        }
        Some(Dimension(out))
    }

    /// True when all exponents are zero
    pub fn is_dimensionless(&self) -> bool {
        *self == Self::NONE
    }
}

/// A parsed unit expression
#[derive(Debug, Clone)]
pub struct Unit {
    text: String,
    factor: f64,
    offset: f64,
    dimension: Dimension,
}

impl Unit {
    /// Parse a unit expression such as `"kelvin"`, `"1/ms"` or `"cm**3"`
    pub fn parse(text: &str) -> Result<Self, UnitError> {
        let text = text.trim();
        let parsed = Parser::new(text)?.parse()?;
        Ok(Unit {
            text: text.to_string(),
            factor: parsed.factor,
            offset: parsed.offset,
            dimension: parsed.dimension,
        })
    }

    /// The dimensionless unit
    pub fn dimensionless() -> Self {
        Unit {
            text: String::new(),
            factor: 1.0,
            offset: 0.0,
            dimension: Dimension::NONE,
        }
    }

    /// The expression as written
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Dimension vector of this unit
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// True if values in `self` can be converted to `other`
    pub fn is_compatible_with(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// Convert a magnitude in this unit to SI base units
    pub fn to_si(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    /// Convert a magnitude in SI base units to this unit
    pub fn from_si(&self, value: f64) -> f64 {
        (value - self.offset) / self.factor
    }
}

/// Units compare by their written form; use [`Quantity::same_as`] for a
/// dimension-aware comparison.
impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Replace unit spellings that other tools do not accept with their
/// canonical form (`Torr` becomes `torr`).
pub fn normalize_unit_name(units: &str) -> String {
    let units = units.trim();
    if units == "Torr" {
        "torr".to_string()
    } else {
        units.to_string()
    }
}

/// A magnitude bound to a unit
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    /// Numeric value in `units`
    pub magnitude: f64,
    /// Unit of the magnitude
    pub units: Unit,
}

impl Quantity {
    /// Build a quantity from a magnitude and a unit expression
    pub fn new(magnitude: f64, units: &str) -> Result<Self, UnitError> {
        Ok(Quantity {
            magnitude,
            units: Unit::parse(units)?,
        })
    }

    /// Parse `"<magnitude> <unit expression>"`, e.g. `"1000 kelvin"`.
    ///
    /// A bare number is dimensionless.
    pub fn parse(text: &str) -> Result<Self, UnitError> {
        let text = text.trim();
        let (value, units) = match text.split_once(char::is_whitespace) {
            Some((value, units)) => (value, units.trim()),
            None => (text, ""),
        };
        let magnitude: f64 = value
            .parse()
            .map_err(|_| UnitError::InvalidMagnitude(value.to_string()))?;
        if units.is_empty() {
            return Ok(Quantity {
                magnitude,
                units: Unit::dimensionless(),
            });
        }
        Self::new(magnitude, units)
    }

    /// Magnitude expressed in SI base units
    pub fn si_magnitude(&self) -> f64 {
        self.units.to_si(self.magnitude)
    }

    /// Magnitude expressed in `target` units
    pub fn value_in(&self, target: &Unit) -> Result<f64, UnitError> {
        if !self.units.is_compatible_with(target) {
            return Err(UnitError::Incompatible {
                from: self.units.to_string(),
                to: target.to_string(),
            });
        }
        Ok(target.from_si(self.si_magnitude()))
    }

    /// Dimension-aware equality: `1 atm` is the same as `101325 Pa`
    pub fn same_as(&self, other: &Quantity) -> bool {
        if !self.units.is_compatible_with(&other.units) {
            return false;
        }
        let (a, b) = (self.si_magnitude(), other.si_magnitude());
        a == b || (a - b).abs() <= 1e-12 * a.abs().max(b.abs())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = format_magnitude(self.magnitude);
        if self.units.as_str().is_empty() {
            f.write_str(&magnitude)
        } else {
            write!(f, "{} {}", magnitude, self.units)
        }
    }
}

/// Format a magnitude for output; whole numbers keep one decimal place
/// (`1000.0`) so they read back as floats
pub fn format_magnitude(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Mul,
    Div,
    Pow,
    Minus,
    LParen,
    RParen,
    Space,
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '%' | '°' | '_')
}

fn tokenize(text: &str) -> Result<Vec<Token>, UnitError> {
    let invalid = |reason: &str| UnitError::InvalidExpression {
        expression: text.to_string(),
        reason: reason.to_string(),
    };
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => {
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                tokens.push(Token::Space);
                continue;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Pow);
                i += 2;
                continue;
            }
            '*' | '·' => tokens.push(Token::Mul),
            '^' => tokens.push(Token::Pow),
            '/' => tokens.push(Token::Div),
            '-' => tokens.push(Token::Minus),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                if i < chars.len() && matches!(chars[i], 'e' | 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && matches!(chars[j], '+' | '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse()
                    .map_err(|_| invalid(&format!("bad number '{}'", literal)))?;
                tokens.push(Token::Number(value));
                continue;
            }
            c if is_name_start(c) || c == 'µ' || c == 'μ' => {
                let start = i;
                while i < chars.len()
                    && (is_name_start(chars[i]) || chars[i] == 'µ' || chars[i] == 'μ')
                {
                    i += 1;
                }
                tokens.push(Token::Name(chars[start..i].iter().collect()));
                // trailing digits are an exponent shorthand (cm3)
                if i < chars.len() && chars[i].is_ascii_digit() {
                    let start = i;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    let literal: String = chars[start..i].iter().collect();
                    let value = literal
                        .parse()
                        .map_err(|_| invalid(&format!("bad exponent '{}'", literal)))?;
                    tokens.push(Token::Pow);
                    tokens.push(Token::Number(value));
                }
                continue;
            }
            other => return Err(invalid(&format!("unexpected character '{}'", other))),
        }
        i += 1;
    }
    Ok(tokens)
}

#[derive(Debug, Clone, Copy)]
struct Parsed {
    factor: f64,
    offset: f64,
    dimension: Dimension,
}

impl Parsed {
    const ONE: Parsed = Parsed {
        factor: 1.0,
        offset: 0.0,
        dimension: Dimension::NONE,
    };

    fn mul(self, other: Parsed) -> Option<Parsed> {
        Some(Parsed {
            factor: self.factor * other.factor,
            offset: 0.0,
            dimension: self.dimension.checked_mul(other.dimension)?,
        })
    }

    fn powi(self, n: i8) -> Option<Parsed> {
        Some(Parsed {
            factor: self.factor.powi(n as i32),
            offset: 0.0,
            dimension: self.dimension.checked_powi(n)?,
        })
    }
}

/// Recursive-descent parser over unit tokens
struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Result<Self, UnitError> {
        let mut tokens = tokenize(text)?;
        // whitespace only matters between two operands
        let mut cleaned = Vec::with_capacity(tokens.len());
        for (idx, token) in tokens.iter().enumerate() {
            if *token == Token::Space {
                let prev_operand = matches!(
                    cleaned.last(),
                    Some(Token::Name(_)) | Some(Token::Number(_)) | Some(Token::RParen)
                );
                let next_operand = matches!(
                    tokens.get(idx + 1),
                    Some(Token::Name(_)) | Some(Token::Number(_)) | Some(Token::LParen)
                );
                if prev_operand && next_operand {
                    cleaned.push(Token::Mul);
                }
            } else {
                cleaned.push(token.clone());
            }
        }
        tokens = cleaned;
        Ok(Parser {
            text,
            tokens,
            pos: 0,
        })
    }

    fn error(&self, reason: impl Into<String>) -> UnitError {
        UnitError::InvalidExpression {
            expression: self.text.to_string(),
            reason: reason.into(),
        }
    }

    fn exponent_overflow(&self) -> UnitError {
        self.error("dimension exponent out of range")
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn parse(mut self) -> Result<Parsed, UnitError> {
        if self.tokens.is_empty() {
            return Err(self.error("empty unit"));
        }
        // a lone offset unit keeps its zero point
        if let [Token::Name(name)] = self.tokens.as_slice() {
            let unit =
                registry::lookup(name).ok_or_else(|| UnitError::UnknownUnit(name.clone()))?;
            return Ok(Parsed {
                factor: unit.factor,
                offset: unit.offset,
                dimension: unit.dimension,
            });
        }
        let parsed = self.expression()?;
        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected trailing tokens"));
        }
        Ok(parsed)
    }

    fn expression(&mut self) -> Result<Parsed, UnitError> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Mul) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    acc = acc.mul(rhs).ok_or_else(|| self.exponent_overflow())?;
                }
                Some(Token::Div) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    acc = rhs
                        .powi(-1)
                        .and_then(|inverse| acc.mul(inverse))
                        .ok_or_else(|| self.exponent_overflow())?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term(&mut self) -> Result<Parsed, UnitError> {
        let base = self.atom()?;
        if self.peek() != Some(&Token::Pow) {
            return Ok(base);
        }
        self.pos += 1;
        let negative = if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            true
        } else {
            false
        };
        match self.next() {
            Some(Token::Number(n)) if n.fract() == 0.0 && n.abs() <= i8::MAX as f64 => {
                let n = n as i8;
                base.powi(if negative { -n } else { n })
                    .ok_or_else(|| self.exponent_overflow())
            }
            _ => Err(self.error("exponent must be an integer")),
        }
    }

    fn atom(&mut self) -> Result<Parsed, UnitError> {
        match self.next() {
            Some(Token::Number(value)) => Ok(Parsed {
                factor: value,
                ..Parsed::ONE
            }),
            Some(Token::Name(name)) => {
                let unit =
                    registry::lookup(&name).ok_or_else(|| UnitError::UnknownUnit(name.clone()))?;
                Ok(Parsed {
                    factor: unit.factor,
                    offset: 0.0,
                    dimension: unit.dimension,
                })
            }
            Some(Token::LParen) => {
                let inner = self.expression()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(self.error("unbalanced parentheses")),
                }
            }
            Some(other) => Err(self.error(format!("unexpected token {:?}", other))),
            None => Err(self.error("unexpected end of expression")),
        }
    }
}
