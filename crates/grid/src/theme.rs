//! Profit-based row shading. The bucket function is the behavioral
//! contract (sign plus magnitude band); the color table is an explicit
//! theme object handed to whatever renders the rows.

/// Profit band breakpoints shared by the gain and loss sides.
const BREAKPOINTS: [f64; 4] = [10.0, 20.0, 30.0, 40.0];

/// Map profit to a signed band index in `-5..=5`: 0 at exactly zero,
/// 1..=5 for gains of (0,10], (10,20], (20,30], (30,40], (40,inf),
/// mirrored negative for losses.
pub fn profit_band(profit: f64) -> i8 {
    if profit == 0.0 {
        return 0;
    }
    let magnitude = profit.abs();
    let mut band = 5i8;
    for (i, bp) in BREAKPOINTS.iter().enumerate() {
        if magnitude <= *bp {
            band = i as i8 + 1;
            break;
        }
    }
    if profit > 0.0 {
        band
    } else {
        -band
    }
}

/// Row background colors per band, one entry per intensity step.
#[derive(Debug, Clone)]
pub struct Theme {
    pub gain: [&'static str; 5],
    pub loss: [&'static str; 5],
    pub neutral: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            gain: [
                "rgba(22, 163, 74, 0.08)",
                "rgba(22, 163, 74, 0.16)",
                "rgba(22, 163, 74, 0.24)",
                "rgba(22, 163, 74, 0.32)",
                "rgba(22, 163, 74, 0.40)",
            ],
            loss: [
                "rgba(220, 38, 38, 0.08)",
                "rgba(220, 38, 38, 0.16)",
                "rgba(220, 38, 38, 0.24)",
                "rgba(220, 38, 38, 0.32)",
                "rgba(220, 38, 38, 0.40)",
            ],
            neutral: "transparent",
        }
    }
}

impl Theme {
    pub fn row_color(&self, band: i8) -> &'static str {
        match band {
            0 => self.neutral,
            1..=5 => self.gain[(band - 1) as usize],
            _ => self.loss[((-band).clamp(1, 5) - 1) as usize],
        }
    }
}
