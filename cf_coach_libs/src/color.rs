use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const ACCENT: Rgb = Rgb(41, 128, 185);
pub const MUTED: Rgb = Rgb(100, 100, 100);
pub const GRID: Rgb = Rgb(200, 200, 200);
pub const STRIPE: Rgb = Rgb(245, 245, 245);

/// Codeforces rank tier of a rating. Unrated (0) falls in the lowest tier.
pub fn rating_color(rating: i32) -> Rgb {
    match rating {
        i32::MIN..=1199 => Rgb::from_hex(0xa3a3a3),
        1200..=1399 => Rgb::from_hex(0x22c55e),
        1400..=1599 => Rgb::from_hex(0x0ea5e9),
        1600..=1899 => Rgb::from_hex(0x8b5cf6),
        1900..=2099 => Rgb::from_hex(0xf97316),
        2100..=2399 => Rgb::from_hex(0xef4444),
        _ => Rgb::from_hex(0xd946ef),
    }
}

pub fn verdict_color(verdict: &str) -> Rgb {
    match verdict {
        "OK" => Rgb(16, 185, 129),
        "WRONG_ANSWER" => Rgb(239, 68, 68),
        _ => Rgb(156, 163, 175),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rating_color_tiers() {
        assert_eq!(rating_color(0).to_string(), "#a3a3a3");
        assert_eq!(rating_color(1199).to_string(), "#a3a3a3");
        assert_eq!(rating_color(1200).to_string(), "#22c55e");
        assert_eq!(rating_color(1500).to_string(), "#0ea5e9");
        assert_eq!(rating_color(1899).to_string(), "#8b5cf6");
        assert_eq!(rating_color(2000).to_string(), "#f97316");
        assert_eq!(rating_color(2399).to_string(), "#ef4444");
        assert_eq!(rating_color(3500).to_string(), "#d946ef");
    }

    #[test]
    fn test_verdict_color() {
        assert_eq!(verdict_color("OK"), Rgb(16, 185, 129));
        assert_eq!(verdict_color("TIME_LIMIT_EXCEEDED"), Rgb(156, 163, 175));
    }
}
