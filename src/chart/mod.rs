use std::fs;
use std::iter;
use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use log::warn;
use plotters::element::BitMapElement;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::{LeaderboardConfig, OutletSeries};
use crate::error::{AppError, Context, Result};

const Y_MAX: f64 = 110.0;
// Data-units reserved below the axis; logos are blitted into this band.
const LOGO_BAND: f64 = 25.0;
const LOGO_TOP_Y: f64 = -4.0;
const BAR_HALF_WIDTH: f64 = 0.35;
const COUNT_LABEL_Y: f64 = 103.0;

/// Render the stacked sentiment chart to `config.output_path` as a PNG,
/// overwriting any previous file. Missing or unreadable logos are skipped
/// silently; out-of-range share triples are drawn as-is.
pub fn render_leaderboard(config: &LeaderboardConfig) -> Result<()> {
    for outlet in &config.outlets {
        let total = outlet.positive_pct + outlet.neutral_pct + outlet.negative_pct;
        if !(95.0..=105.0).contains(&total) {
            warn!(
                "sentiment shares for {} sum to {total:.1}; drawing anyway",
                outlet.name
            );
        }
    }

    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {:?}", parent))?;
        }
    }

    let root = BitMapBackend::new(&config.output_path, (config.width, config.height))
        .into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let outlet_count = config.outlets.len().max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Sentiment Leaderboard - stacked sentiment per outlet (+ article count)",
            ("sans-serif", 36),
        )
        .margin(20)
        .x_label_area_size(0)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(outlet_count as f64 - 0.5), -LOGO_BAND..Y_MAX)
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc("Share of sentiment (%)")
        .y_label_formatter(&|value: &f64| {
            if *value < 0.0 {
                String::new()
            } else {
                format!("{value:.0}")
            }
        })
        .axis_desc_style(("sans-serif", 26))
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(draw_error)?;

    let palette = config.palette;
    let segments: [(&str, RGBColor, fn(&OutletSeries) -> (f64, f64)); 3] = [
        ("Positive", rgb(palette.positive), positive_bounds),
        ("Neutral", rgb(palette.neutral), neutral_bounds),
        ("Negative", rgb(palette.negative), negative_bounds),
    ];

    for (label, color, bounds) in segments {
        let bars = config.outlets.iter().enumerate().map(move |(i, outlet)| {
            let (from, to) = bounds(outlet);
            Rectangle::new(
                [
                    (i as f64 - BAR_HALF_WIDTH, from),
                    (i as f64 + BAR_HALF_WIDTH, to),
                ],
                color.filled(),
            )
        });

        chart
            .draw_series(bars)
            .map_err(draw_error)?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
    }

    let count_style = TextStyle::from(("sans-serif", 20).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(config.outlets.iter().enumerate().map(|(i, outlet)| {
            Text::new(
                format!("{} articles", outlet.article_count),
                (i as f64, COUNT_LABEL_Y),
                count_style.clone(),
            )
        }))
        .map_err(draw_error)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(&TRANSPARENT)
        .label_font(("sans-serif", 22))
        .draw()
        .map_err(draw_error)?;

    // Logos go under the bars in place of categorical tick labels.
    let (plot_width, plot_height) = chart.plotting_area().dim_in_pixel();
    let slot_px = plot_width as f64 / outlet_count as f64;
    let logo_width = (slot_px * (BAR_HALF_WIDTH * 2.0)).max(1.0) as u32;
    let band_units = LOGO_BAND + LOGO_TOP_Y;
    let logo_height = (plot_height as f64 * band_units / (Y_MAX + LOGO_BAND)).max(1.0) as u32;

    for (i, outlet) in config.outlets.iter().enumerate() {
        let Some(path) = outlet.logo_path.as_deref() else {
            continue;
        };
        let Some(logo) = load_logo(path, logo_width, logo_height) else {
            continue;
        };

        let element: BitMapElement<(f64, f64)> =
            ((i as f64 - BAR_HALF_WIDTH, LOGO_TOP_Y), logo).into();
        chart.draw_series(iter::once(element)).map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;

    Ok(())
}

fn positive_bounds(outlet: &OutletSeries) -> (f64, f64) {
    (0.0, outlet.positive_pct)
}

fn neutral_bounds(outlet: &OutletSeries) -> (f64, f64) {
    (
        outlet.positive_pct,
        outlet.positive_pct + outlet.neutral_pct,
    )
}

fn negative_bounds(outlet: &OutletSeries) -> (f64, f64) {
    let base = outlet.positive_pct + outlet.neutral_pct;
    (base, base + outlet.negative_pct)
}

/// Load a logo and fit it to the reserved band. Absence is expected and
/// silent; a file that exists but fails to decode gets one warning.
fn load_logo(path: &Path, width: u32, height: u32) -> Option<DynamicImage> {
    if !path.exists() {
        return None;
    }

    match image::open(path) {
        Ok(logo) => Some(logo.resize_exact(width, height, FilterType::Triangle)),
        Err(err) => {
            warn!("skipping unreadable logo {}: {err}", path.display());
            None
        }
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

fn draw_error(err: impl std::fmt::Display) -> AppError {
    AppError::message(format!("failed to render leaderboard: {err}"))
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::path::PathBuf;
    use std::process;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::SentimentPalette;

    static WORKSPACE_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_workspace(label: &str) -> PathBuf {
        let seq = WORKSPACE_SEQ.fetch_add(1, Ordering::SeqCst);
        let dir = env::temp_dir().join(format!(
            "sentiment-board-chart-{label}-{}-{seq}",
            process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp workspace");
        dir
    }

    fn outlet(name: &str, logo_path: Option<PathBuf>) -> OutletSeries {
        OutletSeries {
            name: name.to_string(),
            positive_pct: 40.0,
            neutral_pct: 45.0,
            negative_pct: 15.0,
            article_count: 12,
            logo_path,
        }
    }

    fn small_config(dir: &PathBuf, outlets: Vec<OutletSeries>) -> LeaderboardConfig {
        LeaderboardConfig {
            outlets,
            palette: SentimentPalette::builtin(),
            output_path: dir.join("leaderboard.png"),
            width: 640,
            height: 400,
        }
    }

    #[test]
    fn renders_without_logo_files() {
        let dir = temp_workspace("no-logos");
        let config = small_config(
            &dir,
            vec![
                outlet("A", Some(dir.join("missing-a.png"))),
                outlet("B", None),
            ],
        );

        render_leaderboard(&config).expect("render succeeds without logos");

        let written = fs::metadata(&config.output_path).expect("chart file exists");
        assert!(written.len() > 0);
    }

    #[test]
    fn renders_existing_logo_file() {
        let dir = temp_workspace("with-logo");
        let logo_path = dir.join("logo.png");
        image::RgbImage::from_pixel(16, 16, image::Rgb([10, 20, 30]))
            .save(&logo_path)
            .expect("write fixture logo");

        let config = small_config(&dir, vec![outlet("A", Some(logo_path))]);

        render_leaderboard(&config).expect("render succeeds with a logo");
        assert!(config.output_path.exists());
    }

    #[test]
    fn out_of_range_shares_do_not_abort_render() {
        let dir = temp_workspace("bad-shares");
        let mut lopsided = outlet("A", None);
        lopsided.positive_pct = 80.0;
        lopsided.neutral_pct = 70.0;

        let config = small_config(&dir, vec![lopsided]);

        render_leaderboard(&config).expect("render tolerates bad share sums");
        assert!(config.output_path.exists());
    }

    #[test]
    fn missing_logo_loads_as_none() {
        let dir = temp_workspace("load-logo");
        assert!(load_logo(&dir.join("nope.png"), 10, 10).is_none());
    }
}
