use std::fmt;
use std::str::FromStr;

/// Errors produced while parsing directive or ID text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    /// A token is not an unsigned 16-bit integer.
    #[error("couldn't convert '{token}' to an integer")]
    NotAnInteger { token: String },

    /// The directive did not contain exactly an ID and a value.
    #[error("expected ID=VALUE, found {count} integer arguments")]
    WrongArity { count: usize },
}

/// A request to set parameter `id` to `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub id: u16,
    pub value: u16,
}

impl FromStr for Directive {
    type Err = DirectiveError;

    /// Parse `"ID=VALUE"` or `"ID VALUE"`.
    ///
    /// `=` and spaces both separate tokens and runs of separators collapse,
    /// so `"10 = 5"` is accepted.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let values = text
            .split(['=', ' '])
            .filter(|token| !token.is_empty())
            .map(parse_u16)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [id, value] => Ok(Self {
                id: *id,
                value: *value,
            }),
            _ => Err(DirectiveError::WrongArity {
                count: values.len(),
            }),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.id, self.value)
    }
}

/// Parse a single parameter ID token.
///
/// Range checking against `MAX_PARAMS` is left to the session so the
/// error names the failing exchange.
pub fn parse_param_id(token: &str) -> Result<u16, DirectiveError> {
    parse_u16(token.trim())
}

fn parse_u16(token: &str) -> Result<u16, DirectiveError> {
    token.parse().map_err(|_| DirectiveError::NotAnInteger {
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_equals_and_space_forms() {
        let expected = Directive { id: 10, value: 5 };
        assert_eq!("10=5".parse::<Directive>(), Ok(expected));
        assert_eq!("10 5".parse::<Directive>(), Ok(expected));
        assert_eq!(" 10 = 5 ".parse::<Directive>(), Ok(expected));
    }

    #[test]
    fn rejects_non_integer_tokens() {
        assert_eq!(
            "11=bogus".parse::<Directive>(),
            Err(DirectiveError::NotAnInteger {
                token: "bogus".to_string()
            })
        );
        assert!("-1=3".parse::<Directive>().is_err());
    }

    #[test]
    fn rejects_values_wider_than_16_bits() {
        assert!(matches!(
            "3=65536".parse::<Directive>(),
            Err(DirectiveError::NotAnInteger { .. })
        ));
        assert_eq!(
            "3=65535".parse::<Directive>(),
            Ok(Directive {
                id: 3,
                value: u16::MAX
            })
        );
    }

    #[test]
    fn rejects_wrong_token_count() {
        assert_eq!(
            "10".parse::<Directive>(),
            Err(DirectiveError::WrongArity { count: 1 })
        );
        assert_eq!(
            "1=2=3".parse::<Directive>(),
            Err(DirectiveError::WrongArity { count: 3 })
        );
        assert_eq!(
            "".parse::<Directive>(),
            Err(DirectiveError::WrongArity { count: 0 })
        );
    }

    #[test]
    fn parses_param_ids() {
        assert_eq!(parse_param_id(" 42 "), Ok(42));
        assert!(parse_param_id("x").is_err());
    }
}
