//! ROI heatmap: per-card color and size for a treemap-style view

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::models::{Card, Category};

/// RGB color, rendered as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// ROI range covered by the gradient; values outside are clamped
pub const ROI_CLAMP: f64 = 0.5;

/// Gradient stops: deep red, red, yellow, green, deep green
const COLOR_STOPS: [(f64, Rgb); 5] = [
    (-0.5, Rgb::new(153, 27, 27)),
    (-0.25, Rgb::new(239, 68, 68)),
    (0.0, Rgb::new(234, 179, 8)),
    (0.25, Rgb::new(34, 197, 94)),
    (0.5, Rgb::new(21, 128, 61)),
];

/// ROI band treated as break-even by the stats
const FLAT_BAND: f64 = 0.01;

/// Card ROI as a fraction: (current - purchase) / purchase, 0 for free cards
pub fn calculate_card_roi(card: &Card) -> f64 {
    if card.purchase_price <= 0.0 {
        return 0.0;
    }
    (card.current_value - card.purchase_price) / card.purchase_price
}

fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let value = f64::from(from) + (f64::from(to) - f64::from(from)) * t;
    value.round().clamp(0.0, 255.0) as u8
}

/// Map a ROI fraction onto the red-yellow-green gradient
pub fn roi_to_color(roi: f64) -> Rgb {
    let roi = if roi.is_nan() {
        0.0
    } else {
        roi.clamp(-ROI_CLAMP, ROI_CLAMP)
    };

    for pair in COLOR_STOPS.windows(2) {
        let (lo, from) = pair[0];
        let (hi, to) = pair[1];
        if roi <= hi {
            let t = (roi - lo) / (hi - lo);
            return Rgb::new(
                lerp_channel(from.r, to.r, t),
                lerp_channel(from.g, to.g, t),
                lerp_channel(from.b, to.b, t),
            );
        }
    }

    COLOR_STOPS[COLOR_STOPS.len() - 1].1
}

/// One cell of the heatmap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCardData {
    pub id: String,
    pub player: String,
    pub year: i32,
    pub brand: String,
    pub category: Category,
    pub current_value: f64,
    pub purchase_price: f64,
    /// Fraction (0.25 = +25%)
    pub roi: f64,
    pub roi_percent: f64,
    pub color: Rgb,
    /// Share of the heatmap's total current value, 0..=1
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapStats {
    pub total_cards: usize,
    pub total_value: f64,
    pub winners: usize,
    pub losers: usize,
    pub flat: usize,
    /// Mean ROI fraction; 0 for an empty heatmap
    pub avg_roi: f64,
}

/// Build heatmap cells for held cards that still carry value
pub fn build_heatmap_data(cards: &[Card]) -> Vec<HeatmapCardData> {
    let held: Vec<&Card> = cards
        .iter()
        .filter(|c| !c.is_sold() && c.current_value != 0.0)
        .collect();
    let total_value: f64 = held.iter().map(|c| c.current_value).sum();

    let data: Vec<HeatmapCardData> = held
        .into_iter()
        .map(|card| {
            let roi = calculate_card_roi(card);
            HeatmapCardData {
                id: card.id.clone(),
                player: card.player.clone(),
                year: card.year,
                brand: card.brand.clone(),
                category: card.category,
                current_value: card.current_value,
                purchase_price: card.purchase_price,
                roi,
                roi_percent: roi * 100.0,
                color: roi_to_color(roi),
                weight: if total_value > 0.0 {
                    card.current_value / total_value
                } else {
                    0.0
                },
            }
        })
        .collect();

    debug!(cells = data.len(), "Built heatmap data");
    data
}

pub fn compute_heatmap_stats(data: &[HeatmapCardData]) -> HeatmapStats {
    let winners = data.iter().filter(|d| d.roi > FLAT_BAND).count();
    let losers = data.iter().filter(|d| d.roi < -FLAT_BAND).count();
    let avg_roi = if data.is_empty() {
        0.0
    } else {
        data.iter().map(|d| d.roi).sum::<f64>() / data.len() as f64
    };

    HeatmapStats {
        total_cards: data.len(),
        total_value: data.iter().map(|d| d.current_value).sum(),
        winners,
        losers,
        flat: data.len() - winners - losers,
        avg_roi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{card, sample_collection};

    #[test]
    fn test_card_roi() {
        assert_eq!(calculate_card_roi(&card("1", "A", 100.0, 150.0)), 0.5);
        assert_eq!(calculate_card_roi(&card("2", "B", 40.0, 30.0)), -0.25);
        assert_eq!(calculate_card_roi(&card("3", "C", 0.0, 30.0)), 0.0);
    }

    #[test]
    fn test_color_stops() {
        assert_eq!(roi_to_color(-0.5), Rgb::new(153, 27, 27));
        assert_eq!(roi_to_color(-0.25), Rgb::new(239, 68, 68));
        assert_eq!(roi_to_color(0.0), Rgb::new(234, 179, 8));
        assert_eq!(roi_to_color(0.25), Rgb::new(34, 197, 94));
        assert_eq!(roi_to_color(0.5), Rgb::new(21, 128, 61));
    }

    #[test]
    fn test_color_clamping() {
        assert_eq!(roi_to_color(-1.0), roi_to_color(-0.5));
        assert_eq!(roi_to_color(1.0), roi_to_color(0.5));
        assert_eq!(roi_to_color(f64::INFINITY), roi_to_color(0.5));
        assert_eq!(roi_to_color(f64::NAN), roi_to_color(0.0));
    }

    #[test]
    fn test_color_midpoint() {
        assert_eq!(roi_to_color(0.125), Rgb::new(134, 188, 51));
        assert_eq!(roi_to_color(0.125).to_string(), "#86bc33");
    }

    #[test]
    fn test_rgb_display_and_json() {
        assert_eq!(Rgb::new(21, 128, 61).to_string(), "#15803d");
        assert_eq!(serde_json::to_string(&Rgb::new(0, 0, 255)).unwrap(), "\"#0000ff\"");
    }

    #[test]
    fn test_excludes_sold_and_worthless_cards() {
        let cards = sample_collection();
        let data = build_heatmap_data(&cards);
        let ids: Vec<&str> = data.iter().map(|d| d.id.as_str()).collect();
        // c3 and c4 are sold
        assert_eq!(ids, vec!["c1", "c2", "c5", "c6"]);
        assert!(data.iter().all(|d| d.current_value != 0.0));

        let worthless = vec![card("1", "A", 5.0, 0.0)];
        assert!(build_heatmap_data(&worthless).is_empty());
    }

    #[test]
    fn test_weights_sum_to_one() {
        let data = build_heatmap_data(&sample_collection());
        let total: f64 = data.iter().map(|d| d.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((data[0].weight - 180.0 / 265.5).abs() < 1e-9);
    }

    #[test]
    fn test_stats() {
        let data = build_heatmap_data(&sample_collection());
        let stats = compute_heatmap_stats(&data);
        assert_eq!(stats.total_cards, 4);
        assert!((stats.total_value - 265.5).abs() < 1e-9);
        // c1 +80%, c5 +175%; c2 -25%; c6 free so roi 0
        assert_eq!(stats.winners, 2);
        assert_eq!(stats.losers, 1);
        assert_eq!(stats.flat, 1);
        assert!((stats.avg_roi - (0.8 - 0.25 + 1.75 + 0.0) / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_empty() {
        let stats = compute_heatmap_stats(&[]);
        assert_eq!(stats.total_cards, 0);
        assert_eq!(stats.avg_roi, 0.0);
        assert_eq!(stats.flat, 0);
    }

    #[test]
    fn test_flat_band() {
        let data = build_heatmap_data(&[card("1", "A", 100.0, 101.0), card("2", "B", 100.0, 99.5)]);
        let stats = compute_heatmap_stats(&data);
        assert_eq!(stats.flat, 2);
    }
}
