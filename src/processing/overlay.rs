//! CSS values a page collaborator applies to a background element.

use crate::processing::luminosity::Analysis;

/// Default RGB of the darkening gradient.
pub const DEFAULT_OVERLAY_COLOR: [u8; 3] = [0, 0, 0];

/// Gradient-over-image `background` value for `image_url`.
///
/// Both gradient stops are painted in `color`.
///
/// `opacity` is written unclamped; CSS clamps alpha to `[0, 1]` itself.
#[must_use]
pub fn background_css(image_url: &str, color: [u8; 3], opacity: f64) -> String {
    let [r, g, b] = color;
    let stop = format!("rgba({r},{g},{b},{opacity})");
    format!("linear-gradient({stop}, {stop}), url('{}')", escape_url(image_url))
}

/// Human-readable caption with floored percentages, e.g.
/// `Image lum : 62% | Overlay opacity: 33%`.
#[must_use]
pub fn debug_caption(analysis: &Analysis) -> String {
    format!(
        "Image lum : {}% | Overlay opacity: {}%",
        percent(analysis.luminosity),
        percent(analysis.overlay_opacity)
    )
}

fn percent(v: f64) -> i64 {
    (v * 100.0).floor() as i64
}

fn escape_url(url: &str) -> String {
    url.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::luminosity::LuminosityAnalyzer;

    #[test]
    fn background_puts_gradient_over_image() {
        let css = background_css("img/hero.jpg", [0, 0, 0], 0.25);
        assert_eq!(
            css,
            "linear-gradient(rgba(0,0,0,0.25), rgba(0,0,0,0.25)), url('img/hero.jpg')"
        );
    }

    #[test]
    fn background_uses_configured_color_and_escapes_quotes() {
        let css = background_css("it's.png", [10, 20, 30], 1.5);
        assert_eq!(
            css,
            "linear-gradient(rgba(10,20,30,1.5), rgba(10,20,30,1.5)), url('it\\'s.png')"
        );
    }

    #[test]
    fn both_stops_use_the_overlay_color() {
        let css = background_css("bg.webp", [255, 128, 0], 0.4);
        let gradient = css
            .strip_prefix("linear-gradient(")
            .and_then(|rest| rest.split_once("), url("))
            .map(|(stops, _)| stops)
            .unwrap();
        let stops: Vec<&str> = gradient.split(", ").collect();
        assert_eq!(stops, ["rgba(255,128,0,0.4)", "rgba(255,128,0,0.4)"]);
        assert!(!css.contains("rgba(0,0,0"));
    }

    #[test]
    fn caption_floors_percentages() {
        let analysis = LuminosityAnalyzer::new(1.85)
            .analyze(&[200, 150, 100, 255])
            .unwrap();
        assert_eq!(
            debug_caption(&analysis),
            "Image lum : 62% | Overlay opacity: 33%"
        );
    }
}
