use std::{fmt::Display, ops::Deref, str::FromStr};

use anyhow::anyhow;

/// Whole percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Percentage(u8);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Percentage {
    pub const FULL: Percentage = Percentage(100);

    pub fn new_opt(value: u32) -> Option<Percentage> {
        if value > 100 {
            None
        } else {
            Some(Percentage(value as u8))
        }
    }
}

impl FromStr for Percentage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // This means that 100%% also works, but I think I'm fine with that
        let s = s.trim_end_matches("%");
        let v = s.parse::<u32>()?;
        Percentage::new_opt(v).ok_or_else(|| anyhow!("Can't parse {s} into percentage"))
    }
}

impl Deref for Percentage {
    type Target = u8;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// `part / whole` rounded to the closest whole percentage. Parts larger than the whole count as
/// a full 100%.
pub fn ratio_percentage(part: u32, whole: u32) -> Percentage {
    if whole == 0 {
        return Percentage::default();
    }
    let value = (part as f64 / whole as f64 * 100.).round() as u32;
    Percentage::new_opt(value).unwrap_or(Percentage::FULL)
}

#[cfg(test)]
mod tests {
    use super::{ratio_percentage, Percentage};

    #[test]
    fn test_parse() {
        assert_eq!("40%".parse::<Percentage>().unwrap(), Percentage(40));
        assert_eq!("7".parse::<Percentage>().unwrap(), Percentage(7));
        assert!("101%".parse::<Percentage>().is_err());
        assert!("-1".parse::<Percentage>().is_err());
    }

    #[test]
    fn test_ratio_rounding() {
        assert_eq!(*ratio_percentage(1, 30), 3);
        assert_eq!(*ratio_percentage(2, 30), 7);
        assert_eq!(*ratio_percentage(15, 30), 50);
        assert_eq!(*ratio_percentage(30, 30), 100);
        assert_eq!(*ratio_percentage(3, 0), 0);
        assert_eq!(ratio_percentage(5, 3), Percentage::FULL);
    }
}
