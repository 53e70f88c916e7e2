use core::fmt::{self, Write};

/// An integer displayed with `,` between groups of three digits.
pub struct Grouped(i128);

impl fmt::Display for Grouped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        if self.0 < 0 {
            f.write_char('-')?;
        }
        for (i, digit) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                f.write_char(',')?;
            }
            f.write_char(digit)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Grouped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

pub trait GroupedDisplayExt {
    fn grouped(&self) -> Grouped;
}

macro_rules! impl_grouped {
    ($($ty:ty),*) => {
        $(
            impl GroupedDisplayExt for $ty {
                fn grouped(&self) -> Grouped {
                    Grouped(*self as i128)
                }
            }
        )*
    };
}

impl_grouped!(u32, u64, usize, i32, i64);

/// Resident memory in MiB with two decimals, or `N/A`.
pub struct Megabytes(pub Option<u64>);

impl fmt::Display for Megabytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(bytes) => write!(f, "{:.2} MB", bytes as f64 / (1024. * 1024.)),
            None => f.write_str("N/A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(0u64.grouped().to_string(), "0");
        assert_eq!(999u64.grouped().to_string(), "999");
        assert_eq!(1_000u64.grouped().to_string(), "1,000");
        assert_eq!(333_833_500i64.grouped().to_string(), "333,833,500");
        assert_eq!((-1_234_567i64).grouped().to_string(), "-1,234,567");
        assert_eq!(1_000_000usize.grouped().to_string(), "1,000,000");
    }

    #[test]
    fn megabytes() {
        assert_eq!(Megabytes(Some(3 * 1024 * 1024 / 2)).to_string(), "1.50 MB");
        assert_eq!(Megabytes(None).to_string(), "N/A");
    }
}
