//! Fit-to-page scale computation.

use crate::error::{DwfError, Result};
use crate::types::{BoundingBox2D, PageTransform, Vector2};

/// Page geometry and scaling options, in points (1/72 inch).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub page_width: f64,
    pub page_height: f64,
    /// Blank border kept on every side
    pub margin: f64,
    /// Fixed scale replacing fit-to-page
    pub override_scale: Option<f64>,
    /// Font size for text records without a font height, in drawing units
    pub default_font_size: f64,
}

impl Default for LayoutOptions {
    /// US Letter landscape with half-inch margins.
    fn default() -> Self {
        Self {
            page_width: 792.0,
            page_height: 612.0,
            margin: 36.0,
            override_scale: None,
            default_font_size: 12.0,
        }
    }
}

impl LayoutOptions {
    /// Printable width and height.
    pub fn printable_area(&self) -> (f64, f64) {
        (
            self.page_width - 2.0 * self.margin,
            self.page_height - 2.0 * self.margin,
        )
    }
}

/// Placement of a drawing on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleResult {
    /// Page points per drawing unit
    pub scale: f64,
    /// Drawing-space extents
    pub source_bbox: BoundingBox2D,
    /// Page-space extents after scaling and translation
    pub translated_bbox: BoundingBox2D,
    pub transform: PageTransform,
}

impl ScaleResult {
    /// Amount added to every scaled coordinate.
    pub fn translation(&self) -> Vector2 {
        self.transform.offset - self.transform.origin * self.scale
    }
}

/// Compute the scale and translation placing `bbox` inside the page
/// margins.
///
/// `bbox` is `None` when the drawing has no geometry.
pub fn compute_scale(bbox: Option<&BoundingBox2D>, options: &LayoutOptions) -> Result<ScaleResult> {
    let bbox = *bbox.ok_or(DwfError::DegenerateGeometry {
        width: 0.0,
        height: 0.0,
    })?;
    let (width, height) = (bbox.width(), bbox.height());
    let (avail_w, avail_h) = options.printable_area();
    if !(avail_w > 0.0 && avail_h > 0.0) {
        return Err(DwfError::Custom(format!(
            "margin {} leaves no printable area on a {}x{} page",
            options.margin, options.page_width, options.page_height
        )));
    }

    let scale = match options.override_scale {
        Some(scale) if scale.is_finite() && scale > 0.0 => scale,
        Some(scale) => return Err(DwfError::Custom(format!("invalid override scale {}", scale))),
        None => {
            if bbox.is_degenerate() {
                return Err(DwfError::DegenerateGeometry { width, height });
            }
            (avail_w / width).min(avail_h / height)
        }
    };

    let offset = Vector2::new(options.margin, options.margin);
    let transform = PageTransform::new(scale, bbox.min, offset);
    let translated_bbox = BoundingBox2D::new(
        transform.apply(bbox.min),
        transform.apply(bbox.max),
    );
    log::debug!("fit {} at scale {:.6}", bbox, scale);

    Ok(ScaleResult {
        scale,
        source_bbox: bbox,
        translated_bbox,
        transform,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(w: f64, h: f64) -> BoundingBox2D {
        BoundingBox2D::new(Vector2::new(100.0, 200.0), Vector2::new(100.0 + w, 200.0 + h))
    }

    #[test]
    fn test_letter_landscape_fit() {
        let result = compute_scale(Some(&bbox(1000.0, 500.0)), &LayoutOptions::default()).unwrap();
        assert!((result.scale - 0.72).abs() < 1e-12);
        assert_eq!(result.translated_bbox.min, Vector2::new(36.0, 36.0));
        assert!((result.translated_bbox.max.x - 756.0).abs() < 1e-9);
        assert!((result.translated_bbox.max.y - 396.0).abs() < 1e-9);
    }

    #[test]
    fn test_translation_subtracts_min() {
        let result = compute_scale(Some(&bbox(1000.0, 500.0)), &LayoutOptions::default()).unwrap();
        let t = result.translation();
        assert!((t.x - (36.0 - 100.0 * 0.72)).abs() < 1e-9);
        assert!((t.y - (36.0 - 200.0 * 0.72)).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_boxes() {
        let options = LayoutOptions::default();
        assert!(matches!(
            compute_scale(None, &options),
            Err(DwfError::DegenerateGeometry { .. })
        ));
        assert!(matches!(
            compute_scale(Some(&bbox(0.0, 10.0)), &options),
            Err(DwfError::DegenerateGeometry { width, .. }) if width == 0.0
        ));
    }

    #[test]
    fn test_override_scale() {
        let options = LayoutOptions {
            override_scale: Some(2.0),
            ..LayoutOptions::default()
        };
        let result = compute_scale(Some(&bbox(0.0, 10.0)), &options).unwrap();
        assert_eq!(result.scale, 2.0);

        let bad = LayoutOptions {
            override_scale: Some(-1.0),
            ..LayoutOptions::default()
        };
        assert!(compute_scale(Some(&bbox(1.0, 1.0)), &bad).is_err());
    }

    #[test]
    fn test_margins_must_leave_printable_area() {
        let wide_margin = LayoutOptions {
            margin: 306.0,
            ..LayoutOptions::default()
        };
        assert_eq!(wide_margin.printable_area().1, 0.0);
        assert!(matches!(
            compute_scale(Some(&bbox(1000.0, 500.0)), &wide_margin),
            Err(DwfError::Custom(_))
        ));

        let negative = LayoutOptions {
            page_width: 50.0,
            override_scale: Some(1.0),
            ..LayoutOptions::default()
        };
        assert!(compute_scale(Some(&bbox(1000.0, 500.0)), &negative).is_err());
    }
}
