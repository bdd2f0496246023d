//! Daily resampling of raw `[timestamp_ms, price]` series.

use super::PricePoint;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Bucket a raw price series into one point per UTC calendar day.
///
/// The latest observation of each day wins, regardless of input order.
/// Points with a non-finite price or an out-of-range timestamp are skipped.
/// Output is ordered by day.
pub fn resample_daily(prices: &[(f64, f64)]) -> Vec<PricePoint> {
    let mut days: BTreeMap<NaiveDate, (i64, Decimal)> = BTreeMap::new();

    for &(timestamp_ms, price) in prices {
        if !timestamp_ms.is_finite() || !price.is_finite() {
            continue;
        }
        let millis = timestamp_ms as i64;
        let Some(at) = DateTime::<Utc>::from_timestamp_millis(millis) else {
            continue;
        };
        let Some(price) = Decimal::from_f64(price) else {
            continue;
        };

        let day = at.date_naive();
        match days.get(&day) {
            Some((seen, _)) if *seen > millis => {}
            _ => {
                days.insert(day, (millis, price));
            }
        }
    }

    days.into_iter()
        .map(|(day, (_, price))| PricePoint {
            day,
            label: day_label(day),
            price,
        })
        .collect()
}

/// `"Jan 5"`-style label used on chart axes.
pub fn day_label(day: NaiveDate) -> String {
    day.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_1_2024_MS: f64 = 1_704_067_200_000.0;
    const HOUR_MS: f64 = 3_600_000.0;
    const DAY_MS: f64 = 24.0 * HOUR_MS;

    fn dec(v: f64) -> Decimal {
        Decimal::from_f64(v).unwrap()
    }

    #[test]
    fn test_one_point_per_day_last_wins() {
        let series = vec![
            (JAN_1_2024_MS, 100.0),
            (JAN_1_2024_MS + 12.0 * HOUR_MS, 110.0),
            (JAN_1_2024_MS + 23.0 * HOUR_MS, 120.0),
            (JAN_1_2024_MS + DAY_MS + HOUR_MS, 90.0),
        ];
        let points = resample_daily(&series);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "Jan 1");
        assert_eq!(points[0].price, dec(120.0));
        assert_eq!(points[1].label, "Jan 2");
        assert_eq!(points[1].price, dec(90.0));
    }

    #[test]
    fn test_unordered_input_keeps_latest_observation() {
        let series = vec![
            (JAN_1_2024_MS + 20.0 * HOUR_MS, 5.0),
            (JAN_1_2024_MS + HOUR_MS, 1.0),
        ];
        let points = resample_daily(&series);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].price, dec(5.0));
    }

    #[test]
    fn test_output_sorted_by_day() {
        let series = vec![
            (JAN_1_2024_MS + 2.0 * DAY_MS, 3.0),
            (JAN_1_2024_MS, 1.0),
            (JAN_1_2024_MS + DAY_MS, 2.0),
        ];
        let labels: Vec<_> = resample_daily(&series)
            .into_iter()
            .map(|p| p.label)
            .collect();
        assert_eq!(labels, vec!["Jan 1", "Jan 2", "Jan 3"]);
    }

    #[test]
    fn test_non_finite_points_skipped() {
        let series = vec![(JAN_1_2024_MS, f64::NAN), (f64::INFINITY, 1.0)];
        assert!(resample_daily(&series).is_empty());
    }

    #[test]
    fn test_empty_series() {
        assert!(resample_daily(&[]).is_empty());
    }

    #[test]
    fn test_day_label_has_no_padding() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(day_label(day), "Mar 9");
    }
}
