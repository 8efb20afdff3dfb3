use anyhow::{Context, Result};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse comma-separated seed tokens. Negative numbers fold to their
/// magnitude.
pub fn parse_seeds(raw: &str) -> Result<Vec<u64>> {
    split_csv(raw)
        .iter()
        .map(|token| {
            token
                .parse::<i64>()
                .map(i64::unsigned_abs)
                .or_else(|_| token.parse::<u64>())
                .with_context(|| format!("invalid seed '{token}'"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn parse_seeds_accepts_signed_and_large_values() {
        let seeds = parse_seeds("1337, -5, 18446744073709551615").unwrap();
        assert_eq!(seeds, vec![1337, 5, u64::MAX]);
    }

    #[test]
    fn parse_seeds_rejects_words() {
        let err = parse_seeds("1,maize").unwrap_err();
        assert!(err.to_string().contains("maize"));
    }
}
