use std::str::FromStr;

use crate::prelude::*;

/// One value per billing period, in chronological order.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    derive_more::Deref,
    derive_more::From,
    derive_more::IntoIterator,
)]
#[must_use]
pub struct Series<T>(Vec<T>);

/// Parse whitespace-separated values, for example `"50 48.5 61"`.
impl<T> FromStr for Series<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.split_whitespace()
            .map(|token| token.parse().with_context(|| format!("`{token}` is not a number")))
            .collect::<Result<Vec<T>>>()
            .map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::power::Kilowatts;

    #[test]
    fn test_parse_ok() {
        let series: Series<Kilowatts> = " 50 48.5\n61\t0 ".parse().unwrap();
        assert_eq!(
            *series,
            [Kilowatts::from(50.0), Kilowatts::from(48.5), Kilowatts::from(61.0), Kilowatts::ZERO]
        );
    }

    #[test]
    fn test_parse_empty() {
        let series: Series<Kilowatts> = "   ".parse().unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        let error = "50 fifty".parse::<Series<Kilowatts>>().unwrap_err();
        assert_eq!(error.to_string(), "`fifty` is not a number");
    }
}
