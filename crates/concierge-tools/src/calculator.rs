//! Restricted-grammar arithmetic evaluator.
//!
//! Accepts numeric literals, `+ - * / **`, parentheses, the functions
//! `sqrt abs pow min max round` and the constants `pi e`. Nothing else
//! is evaluated; there is no variable binding and no host-language escape.
//!
//! Precedence follows conventional math notation: `**` binds tighter than
//! unary minus and is right-associative, so `-2 ** 2 == -4` and
//! `2 ** 3 ** 2 == 512`.

const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("division by zero is not allowed")]
    DivisionByZero,
    #[error("invalid syntax in expression: {0}")]
    SyntaxInvalid(String),
    #[error("unknown function or variable: {0}")]
    UnknownSymbol(String),
    #[error("math domain error: {0}")]
    MathDomain(String),
}

impl CalcError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DivisionByZero => "DivisionByZero",
            Self::SyntaxInvalid(_) => "SyntaxInvalid",
            Self::UnknownSymbol(_) => "UnknownSymbol",
            Self::MathDomain(_) => "MathDomain",
        }
    }
}

/// Evaluate `expression` and format the result.
///
/// Integral results print without a fractional part (`"4"`); others are
/// rounded to six decimals with trailing zeros trimmed (`"3.333333"`).
pub fn evaluate(expression: &str) -> Result<String, CalcError> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(CalcError::SyntaxInvalid("empty expression".into()));
    }
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(CalcError::SyntaxInvalid(format!(
            "unexpected {} at end of '{expression}'",
            tok.describe()
        )));
    }
    if !value.is_finite() {
        return Err(CalcError::MathDomain("result is out of range".into()));
    }
    Ok(format_number(value))
}

fn format_number(value: f64) -> String {
    // Normalise negative zero.
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let fixed = format!("{value:.6}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Pow,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {n}"),
            Self::Ident(name) => format!("'{name}'"),
            Self::Plus => "'+'".into(),
            Self::Minus => "'-'".into(),
            Self::Star => "'*'".into(),
            Self::Slash => "'/'".into(),
            Self::Pow => "'**'".into(),
            Self::LParen => "'('".into(),
            Self::RParen => "')'".into(),
            Self::Comma => "','".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent only when followed by digits, so `2e` stays `2` then `e`.
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j < chars.len() && chars[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal.parse::<f64>().map_err(|_| {
                    CalcError::SyntaxInvalid(format!("invalid number '{literal}'"))
                })?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Pow);
                i += 2;
            }
            '+' | '-' | '*' | '/' | '(' | ')' | ',' => {
                tokens.push(match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    _ => Token::Comma,
                });
                i += 1;
            }
            other => {
                return Err(CalcError::SyntaxInvalid(format!(
                    "unexpected character '{other}'"
                )))
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), CalcError> {
        if self.eat(expected) {
            return Ok(());
        }
        let found = self
            .peek()
            .map(Token::describe)
            .unwrap_or_else(|| "end of input".into());
        Err(CalcError::SyntaxInvalid(format!(
            "expected {}, found {found}",
            expected.describe()
        )))
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::SyntaxInvalid("expression nested too deeply".into()));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        self.enter()?;
        let mut value = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                value += self.term()?;
            } else if self.eat(&Token::Minus) {
                value -= self.term()?;
            } else {
                break;
            }
        }
        self.depth -= 1;
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                value *= self.unary()?;
            } else if self.eat(&Token::Slash) {
                let rhs = self.unary()?;
                if rhs == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                value /= rhs;
            } else {
                break;
            }
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        self.enter()?;
        let value = if self.eat(&Token::Minus) {
            -self.unary()?
        } else if self.eat(&Token::Plus) {
            self.unary()?
        } else {
            self.power()?
        };
        self.depth -= 1;
        Ok(value)
    }

    fn power(&mut self) -> Result<f64, CalcError> {
        let base = self.primary()?;
        if self.eat(&Token::Pow) {
            let exponent = self.unary()?;
            return checked_pow(base, exponent);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    let args = self.arguments()?;
                    call_function(&name, &args)
                } else {
                    constant(&name)
                }
            }
            Some(tok) => Err(CalcError::SyntaxInvalid(format!(
                "unexpected {}",
                tok.describe()
            ))),
            None => Err(CalcError::SyntaxInvalid("unexpected end of input".into())),
        }
    }

    /// Comma-separated arguments after an opening parenthesis.
    fn arguments(&mut self) -> Result<Vec<f64>, CalcError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen)?;
            return Ok(args);
        }
    }
}

fn constant(name: &str) -> Result<f64, CalcError> {
    match name {
        "pi" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        "sqrt" | "abs" | "pow" | "min" | "max" | "round" => Err(CalcError::SyntaxInvalid(
            format!("function '{name}' must be called with arguments"),
        )),
        other => Err(CalcError::UnknownSymbol(other.to_string())),
    }
}

fn call_function(name: &str, args: &[f64]) -> Result<f64, CalcError> {
    let arity = |expected: &str| {
        CalcError::SyntaxInvalid(format!(
            "{name}() takes {expected} argument(s), got {}",
            args.len()
        ))
    };

    match name {
        "sqrt" => match args {
            [x] if *x < 0.0 => Err(CalcError::MathDomain(format!("sqrt of negative number {x}"))),
            [x] => Ok(x.sqrt()),
            _ => Err(arity("1")),
        },
        "abs" => match args {
            [x] => Ok(x.abs()),
            _ => Err(arity("1")),
        },
        "pow" => match args {
            [x, y] => checked_pow(*x, *y),
            _ => Err(arity("2")),
        },
        "min" | "max" => {
            if args.is_empty() {
                return Err(arity("at least 1"));
            }
            let pick = if name == "min" { f64::min } else { f64::max };
            Ok(args[1..].iter().fold(args[0], |acc, v| pick(acc, *v)))
        }
        "round" => match args {
            [x] => Ok(x.round_ties_even()),
            [x, digits] if digits.fract() == 0.0 => {
                let scale = 10f64.powi(*digits as i32);
                Ok((x * scale).round_ties_even() / scale)
            }
            [_, _] => Err(CalcError::SyntaxInvalid(
                "round() digits must be an integer".into(),
            )),
            _ => Err(arity("1 or 2")),
        },
        other => Err(CalcError::UnknownSymbol(other.to_string())),
    }
}

fn checked_pow(base: f64, exponent: f64) -> Result<f64, CalcError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(CalcError::MathDomain(format!(
            "negative base {base} with fractional exponent {exponent}"
        )));
    }
    Ok(base.powf(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_arithmetic() {
        assert_eq!(evaluate("2 + 2").unwrap(), "4");
        assert_eq!(evaluate("128 * 46").unwrap(), "5888");
        assert_eq!(evaluate("10 * 5 + 3").unwrap(), "53");
        assert_eq!(evaluate("(1 + 2) * 3").unwrap(), "9");
    }

    #[test]
    fn fractional_results_are_trimmed() {
        assert_eq!(evaluate("10 / 3").unwrap(), "3.333333");
        assert_eq!(evaluate("1 / 4").unwrap(), "0.25");
        assert_eq!(evaluate("7 / 2").unwrap(), "3.5");
    }

    #[test]
    fn power_precedence_and_associativity() {
        assert_eq!(evaluate("2 ** 8").unwrap(), "256");
        assert_eq!(evaluate("-2 ** 2").unwrap(), "-4");
        assert_eq!(evaluate("2 ** 3 ** 2").unwrap(), "512");
        assert_eq!(evaluate("2 ** -1").unwrap(), "0.5");
    }

    #[test]
    fn functions_and_constants() {
        assert_eq!(evaluate("sqrt(16)").unwrap(), "4");
        assert_eq!(evaluate("max(10, 20, 5)").unwrap(), "20");
        assert_eq!(evaluate("min(3, -1)").unwrap(), "-1");
        assert_eq!(evaluate("abs(-7)").unwrap(), "7");
        assert_eq!(evaluate("pow(2, 10)").unwrap(), "1024");
        assert_eq!(evaluate("round(2.5)").unwrap(), "2");
        assert_eq!(evaluate("round(3.14159, 2)").unwrap(), "3.14");
        assert_eq!(evaluate("pi").unwrap(), "3.141593");
        assert_eq!(evaluate("2e3").unwrap(), "2000");
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(evaluate("1 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("0 ** -1"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn syntax_errors() {
        assert!(matches!(evaluate(""), Err(CalcError::SyntaxInvalid(_))));
        assert!(matches!(evaluate("2 +"), Err(CalcError::SyntaxInvalid(_))));
        assert!(matches!(evaluate("(2 + 3"), Err(CalcError::SyntaxInvalid(_))));
        assert!(matches!(evaluate("2 $ 3"), Err(CalcError::SyntaxInvalid(_))));
        assert!(matches!(evaluate("sqrt"), Err(CalcError::SyntaxInvalid(_))));
        assert!(matches!(evaluate("sqrt(1, 2)"), Err(CalcError::SyntaxInvalid(_))));
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        assert_eq!(
            evaluate("__import__(1)"),
            Err(CalcError::UnknownSymbol("__import__".into()))
        );
        assert_eq!(evaluate("x + 1"), Err(CalcError::UnknownSymbol("x".into())));
    }

    #[test]
    fn domain_errors() {
        assert!(matches!(evaluate("sqrt(-1)"), Err(CalcError::MathDomain(_))));
        assert!(matches!(evaluate("(-8) ** 0.5"), Err(CalcError::MathDomain(_))));
        assert!(matches!(evaluate("10 ** 400"), Err(CalcError::MathDomain(_))));
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let expr = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert!(matches!(evaluate(&expr), Err(CalcError::SyntaxInvalid(_))));
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(evaluate("-0").unwrap(), "0");
    }
}
