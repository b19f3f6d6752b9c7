//! Chart export
//!
//! Renders trend and activity charts to PNG with plotters and writes them
//! to disk.

use std::path::Path;

use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat, RgbImage};
use serde::Serialize;
use tracing::info;

use super::dashboard::{get_workout_activity, parse_view};
use super::measurements::get_metric_trend;
use crate::engine::buckets::{CountBucket, SeriesPoint};
use crate::store::RecordStore;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 400;

const MIN_SIDE: u32 = 200;
const MAX_SIDE: u32 = 4000;

/// Response for chart exports
#[derive(Debug, Serialize)]
pub struct ChartExportResponse {
    pub path: String,
    pub points: usize,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
}

fn check_size(width: u32, height: u32) -> Result<(), String> {
    let ok = |v: u32| (MIN_SIDE..=MAX_SIDE).contains(&v);
    if !ok(width) || !ok(height) {
        return Err(format!(
            "Chart size must be between {} and {} pixels per side",
            MIN_SIDE, MAX_SIDE
        ));
    }
    Ok(())
}

/// Y axis bounds with some headroom around the data
fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let pad = ((max - min) * 0.1).max(1.0);
    (min - pad, max + pad)
}

fn encode_png(width: u32, height: u32, buffer: Vec<u8>) -> Result<Vec<u8>, String> {
    let img = RgbImage::from_raw(width, height, buffer).ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

/// Area chart of a metric series as PNG bytes
pub fn render_series_chart(
    title: &str,
    unit: &str,
    points: &[SeriesPoint],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if points.is_empty() {
        return Err("No data to chart".to_string());
    }
    check_size(width, height)?;

    let accent = RGBColor(16, 185, 129);
    let (y_min, y_max) = value_range(points.iter().map(|p| p.value));
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let n = points.len() as i32;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0..n, y_min..y_max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .x_labels(points.len().min(10))
            .x_label_formatter(&|x| {
                if *x >= 0 {
                    points.get(*x as usize).map(|p| p.label.clone()).unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .y_desc(unit)
            .draw()
            .map_err(|e| e.to_string())?;

        let series: Vec<(i32, f64)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as i32, p.value))
            .collect();

        chart
            .draw_series(
                AreaSeries::new(series.clone(), y_min, accent.mix(0.2)).border_style(accent.stroke_width(2)),
            )
            .map_err(|e| e.to_string())?;

        chart
            .draw_series(series.iter().map(|(x, y)| Circle::new((*x, *y), 3, accent.filled())))
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    encode_png(width, height, buffer)
}

/// Bar chart of workout counts as PNG bytes
pub fn render_activity_chart(
    title: &str,
    buckets: &[CountBucket],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if buckets.is_empty() {
        return Err("No data to chart".to_string());
    }
    check_size(width, height)?;

    let bar = RGBColor(59, 130, 246);
    let max_count = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let n = buckets.len() as i32;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(0..n, 0u32..(max_count + 1))
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(buckets.len())
            .x_label_formatter(&|x| {
                if *x >= 0 {
                    buckets.get(*x as usize).map(|b| b.label.clone()).unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .y_desc("Workouts")
            .draw()
            .map_err(|e| e.to_string())?;

        chart
            .draw_series(buckets.iter().enumerate().map(|(i, b)| {
                let x = i as i32;
                let mut rect = Rectangle::new([(x, 0), (x + 1, b.count)], bar.filled());
                rect.set_margin(0, 0, 6, 6);
                rect
            }))
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    encode_png(width, height, buffer)
}

fn write_png(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }
    std::fs::write(path, bytes).map_err(|e| format!("Failed to write chart: {}", e))
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Render a body-metric trend and save it as PNG
pub fn export_metric_chart(
    store: &dyn RecordStore,
    metric: &str,
    view: &str,
    output_path: &Path,
    width: u32,
    height: u32,
) -> Result<ChartExportResponse, String> {
    let trend = get_metric_trend(store, metric, view)?;
    let title = format!("{} ({})", trend.metric_display, trend.view.as_str());
    let png = render_series_chart(&title, trend.unit, &trend.points, width, height)?;

    write_png(output_path, &png)?;
    info!(path = %output_path.display(), points = trend.points.len(), "Exported metric chart");

    Ok(ChartExportResponse {
        path: output_path.display().to_string(),
        points: trend.points.len(),
        width,
        height,
        size_bytes: png.len(),
    })
}

/// Render workout activity counts and save them as PNG
pub fn export_activity_chart(
    store: &dyn RecordStore,
    view: Option<&str>,
    output_path: &Path,
    width: u32,
    height: u32,
    today: NaiveDate,
) -> Result<ChartExportResponse, String> {
    let view = parse_view(view)?;
    let activity = get_workout_activity(store, Some(view.as_str()), today)?;
    let title = format!("Workout activity ({})", view.as_str());
    let png = render_activity_chart(&title, &activity.buckets, width, height)?;

    write_png(output_path, &png)?;
    info!(path = %output_path.display(), buckets = activity.buckets.len(), "Exported activity chart");

    Ok(ChartExportResponse {
        path: output_path.display().to_string(),
        points: activity.buckets.len(),
        width,
        height,
        size_bytes: png.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_empty_series_is_an_error() {
        let err = render_series_chart("Weight", "kg", &[], DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap_err();
        assert_eq!(err, "No data to chart");
        let err = render_activity_chart("Activity", &[], DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap_err();
        assert_eq!(err, "No data to chart");
    }

    #[test]
    fn test_size_limits() {
        let points = vec![SeriesPoint { label: "Oct 1".into(), value: 70.0 }];
        assert!(render_series_chart("Weight", "kg", &points, 10, 400).is_err());
        assert!(render_series_chart("Weight", "kg", &points, 800, 5000).is_err());
    }

    #[test]
    fn test_value_range_pads() {
        let (lo, hi) = value_range([70.0, 80.0].into_iter());
        assert_eq!((lo, hi), (69.0, 81.0));

        // Flat series still gets a visible range
        let (lo, hi) = value_range([70.0].into_iter());
        assert_eq!((lo, hi), (69.0, 71.0));
    }

    #[test]
    fn test_export_without_data_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weight.png");
        let store = MemoryStore::new();

        let err = export_metric_chart(&store, "weight", "daily", &path, DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap_err();
        assert_eq!(err, "No data to chart");
        assert!(!path.exists());

        assert!(export_metric_chart(&store, "wingspan", "daily", &path, DEFAULT_WIDTH, DEFAULT_HEIGHT).is_err());
    }
}
