//! Staking rewards projection
//!
//! Feeds the bar chart under the calculator: a stake compounded yearly at a
//! fixed rate, sampled at a few horizons.

/// Stake used when the input is empty or invalid
pub const DEFAULT_STAKE: u64 = 1000;
/// Yearly reward rate in percent
pub const ANNUAL_RATE_PERCENT: f64 = 10.0;
/// Horizons shown on the chart, in years
pub const HORIZONS: [u32; 5] = [0, 1, 2, 5, 10];
pub const TOKEN: &str = "WMTX";

/// Value of `initial` after compounding `rate_percent` yearly for `years`
pub fn compounded_return(initial: f64, rate_percent: f64, years: u32) -> f64 {
    initial * (1.0 + rate_percent / 100.0).powi(years as i32)
}

/// Keep only ASCII digits (the calculator input accepts nothing else)
pub fn sanitize_amount(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse a stake from the input box
///
/// Empty, zero or unparsable input falls back to the default stake.
pub fn parse_stake(raw: &str) -> u64 {
    match sanitize_amount(raw).parse::<u64>() {
        Ok(0) | Err(_) => DEFAULT_STAKE,
        Ok(stake) => stake,
    }
}

/// Format an integer with comma thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Chart horizon label ("Initial", "1 Year", "5 Years")
pub fn horizon_label(years: u32) -> String {
    match years {
        0 => "Initial".to_string(),
        1 => "1 Year".to_string(),
        n => format!("{} Years", n),
    }
}

/// Bar fill for a horizon: the stake itself, the short term, then the long run
pub fn bar_color(years: u32) -> &'static str {
    match years {
        0 => "rgba(255, 255, 0, 0.7)",
        1..=2 => "rgba(255, 51, 0, 0.7)",
        _ => "rgba(51, 204, 0, 0.7)",
    }
}

/// Chart series for one stake
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub stake: u64,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Projection {
    pub fn for_stake(stake: u64) -> Self {
        let stake = stake.max(1);
        let labels = HORIZONS.iter().map(|&y| horizon_label(y)).collect();
        let values = HORIZONS
            .iter()
            .map(|&y| compounded_return(stake as f64, ANNUAL_RATE_PERCENT, y))
            .collect();
        Self {
            stake,
            labels,
            values,
        }
    }

    /// One fill color per bar
    pub fn bar_colors(&self) -> Vec<&'static str> {
        HORIZONS.iter().map(|&y| bar_color(y)).collect()
    }

    /// Dataset title shown above the bars
    pub fn dataset_label(&self) -> String {
        format!(
            "{} Staking Rewards (Starting with {} {})",
            TOKEN,
            group_thousands(self.stake),
            TOKEN
        )
    }

    /// Tooltip text for one bar
    pub fn tooltip_lines(&self, value: f64) -> [String; 3] {
        let profit = value - self.stake as f64;
        let growth = profit / self.stake as f64 * 100.0;
        [
            format!("Total: {:.0} {}", value, TOKEN),
            format!("Profit: {:.0} {}", profit, TOKEN),
            format!("Growth: {:.1}%", growth),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compounded_return() {
        assert!((compounded_return(1000.0, 10.0, 0) - 1000.0).abs() < 1e-9);
        assert!((compounded_return(1000.0, 10.0, 1) - 1100.0).abs() < 1e-9);
        assert!((compounded_return(1000.0, 10.0, 2) - 1210.0).abs() < 1e-9);
        assert!((compounded_return(1000.0, 10.0, 10) - 2593.742460100002).abs() < 1e-6);
    }

    #[test]
    fn test_parse_stake() {
        assert_eq!(parse_stake("2500"), 2500);
        assert_eq!(parse_stake("2,500 WMTX"), 2500);
        assert_eq!(parse_stake(""), DEFAULT_STAKE);
        assert_eq!(parse_stake("abc"), DEFAULT_STAKE);
        assert_eq!(parse_stake("0"), DEFAULT_STAKE);
        assert_eq!(parse_stake("99999999999999999999999"), DEFAULT_STAKE);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_projection() {
        let projection = Projection::for_stake(1000);
        assert_eq!(
            projection.labels,
            vec!["Initial", "1 Year", "2 Years", "5 Years", "10 Years"]
        );
        assert_eq!(projection.values.len(), 5);
        assert_eq!(projection.values[0], 1000.0);
        assert_eq!(
            projection.dataset_label(),
            "WMTX Staking Rewards (Starting with 1,000 WMTX)"
        );

        let [total, profit, growth] = projection.tooltip_lines(projection.values[2]);
        assert_eq!(total, "Total: 1210 WMTX");
        assert_eq!(profit, "Profit: 210 WMTX");
        assert_eq!(growth, "Growth: 21.0%");
    }

    #[test]
    fn test_bar_colors_follow_horizons() {
        let colors = Projection::for_stake(DEFAULT_STAKE).bar_colors();
        assert_eq!(colors.len(), HORIZONS.len());
        assert_eq!(colors[0], "rgba(255, 255, 0, 0.7)");
        assert_eq!(colors[1], colors[2]);
        assert_eq!(colors[3], colors[4]);
        assert_ne!(colors[2], colors[3]);
    }

    #[test]
    fn test_projection_minimum_stake() {
        assert_eq!(Projection::for_stake(0).stake, 1);
    }
}
