//! Saving and loading a painting in either format.

use std::path::Path;

use tracing::{info, warn};

use super::{Painting, PaintingError, PaintingEvent};
use crate::constants::FORMAT_VERSION;
use crate::format::{
    Document, Format, FormatError, LoadError, LoadReport, LoadWarning, StrokeRecord,
    StructuredPainting, binary, structured,
};
use crate::types::PointSample;

impl Painting {
    /// Snapshot every stroke together with the current used-brush table.
    ///
    /// Brush indices are resolved here, on every call, because the used set
    /// depends on session history.
    pub fn to_document(&self) -> Result<Document, FormatError> {
        let brushes = self.registry.list_used();

        let strokes = self
            .strokes
            .iter()
            .map(|stroke| {
                let brush_index = brushes
                    .iter()
                    .position(|name| name == stroke.brush_name())
                    .ok_or_else(|| FormatError::UnusedBrush(stroke.brush_name().to_owned()))?;
                Ok(StrokeRecord {
                    brush_index,
                    color: stroke.color(),
                    size: stroke.size(),
                    points: stroke.points().to_vec(),
                })
            })
            .collect::<Result<Vec<_>, FormatError>>()?;

        Ok(Document {
            version: FORMAT_VERSION,
            brushes,
            strokes,
        })
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, FormatError> {
        let bytes = binary::encode(&self.to_document()?)?;
        info!(
            "Painting::to_binary: {} strokes, {} bytes",
            self.strokes.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    pub fn to_structured(&self) -> Result<StructuredPainting, FormatError> {
        Ok(structured::to_structured(&self.to_document()?))
    }

    pub fn to_json_string(&self) -> Result<String, FormatError> {
        structured::to_json_string(&self.to_document()?)
    }

    /// Write the painting to disk, choosing the format from the extension.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<Format, FormatError> {
        let path = path.as_ref();
        let format = Format::from_path(path)
            .ok_or_else(|| FormatError::UnsupportedExtension(path.to_path_buf()))?;
        let bytes = match format {
            Format::Binary => self.to_binary()?,
            Format::Structured => self.to_json_string()?.into_bytes(),
        };
        std::fs::write(path, bytes)?;
        info!("Painting::save_file: wrote {} ({})", path.display(), format);
        Ok(format)
    }

    /// Load a binary painting, appending its strokes.
    pub fn load_binary(&mut self, bytes: &[u8]) -> Result<LoadReport, LoadError> {
        let (document, trailing) = binary::decode(bytes)?;

        let mut warnings = Vec::new();
        if trailing > 0 {
            let warning = LoadWarning::TrailingBytes(trailing);
            warn!("Painting::load_binary: {}", warning);
            warnings.push(warning);
        }

        self.replay(&document, Format::Binary, warnings)
    }

    /// Load a parsed structured painting, appending its strokes.
    pub fn load_structured(&mut self, tree: &StructuredPainting) -> Result<LoadReport, LoadError> {
        let document = structured::from_structured(tree);
        self.replay(&document, Format::Structured, Vec::new())
    }

    pub fn load_json_str(&mut self, json: &str) -> Result<LoadReport, LoadError> {
        self.load_structured(&structured::parse_json(json)?)
    }

    /// Load a painting from disk, choosing the format from the extension.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, LoadError> {
        let path = path.as_ref();
        let format = Format::from_path(path)
            .ok_or_else(|| LoadError::UnsupportedExtension(path.to_path_buf()))?;
        let bytes = std::fs::read(path)?;
        match format {
            Format::Binary => self.load_binary(&bytes),
            Format::Structured => self.load_structured(&structured::parse_json_slice(&bytes)?),
        }
    }

    /// Replay an already decoded document.
    pub fn load_document(
        &mut self,
        document: &Document,
        format: Format,
    ) -> Result<LoadReport, LoadError> {
        self.replay(document, format, Vec::new())
    }

    fn replay(
        &mut self,
        document: &Document,
        format: Format,
        mut warnings: Vec<LoadWarning>,
    ) -> Result<LoadReport, LoadError> {
        // Every fatal check happens before the first stroke is created
        if document.version != FORMAT_VERSION {
            if self.config.strict_version {
                return Err(LoadError::UnsupportedVersion {
                    found: document.version,
                    expected: FORMAT_VERSION,
                });
            }
            let warning = LoadWarning::VersionMismatch {
                found: document.version,
                expected: FORMAT_VERSION,
            };
            warn!("Painting::load: {}", warning);
            warnings.push(warning);
        }
        if !document.strokes.is_empty() && self.registry.is_empty() {
            return Err(PaintingError::NoBrushes.into());
        }

        let refilter = self.config.refilter_on_load;
        let mut points_admitted = 0;
        let mut points_dropped = 0;

        for record in &document.strokes {
            let requested = document.brush_name(record.brush_index);
            let (descriptor, warning) = self.resolve_brush(requested)?;
            warnings.extend(warning);

            let handle = self.create_stroke(descriptor, record.color, record.size);
            let stroke = &mut self.strokes[handle.index()];

            for point in &record.points {
                // Pointer position is not persisted
                let sample = PointSample::at(
                    point.position,
                    point.orientation,
                    point.pressure,
                    point.timestamp,
                );
                if !refilter {
                    stroke.push_unfiltered(sample);
                    points_admitted += 1;
                } else if stroke.add_point(sample) {
                    points_admitted += 1;
                } else {
                    points_dropped += 1;
                }
            }
        }

        let strokes_created = document.strokes.len();
        info!(
            "Painting::load: {} strokes from {} ({} points, {} dropped, {} warnings)",
            strokes_created,
            format,
            points_admitted,
            points_dropped,
            warnings.len()
        );
        self.emit_event(PaintingEvent::ModelLoaded {
            format,
            strokes: strokes_created,
        });

        Ok(LoadReport {
            format,
            version: document.version,
            strokes_created,
            points_admitted,
            points_dropped,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use apainter_config::PainterConfig;
    use approx::assert_abs_diff_eq;
    use glam::{Quat, Vec3};

    use super::*;
    use crate::brush::{BrushOptions, BrushRegistry, FlatBrush, RibbonBrush};
    use crate::types::Color;

    fn registry() -> Arc<BrushRegistry> {
        let mut registry = BrushRegistry::new();
        registry
            .register_brush::<FlatBrush>("flat", BrushOptions::new(0.01, 0))
            .unwrap();
        registry
            .register_brush::<RibbonBrush>("ribbon", BrushOptions::default())
            .unwrap();
        registry
            .register_brush::<FlatBrush>("marker", BrushOptions::new(0.0, 0))
            .unwrap();
        Arc::new(registry)
    }

    fn sample(x: f32, y: f32, z: f32, timestamp: u32) -> PointSample {
        PointSample::at(
            Vec3::new(x, y, z),
            Quat::from_rotation_y(x + z),
            0.5 + z,
            timestamp,
        )
    }

    /// Two strokes: "marker" drawn first, then "flat".
    fn drawn_painting() -> Painting {
        let mut painting = Painting::new(registry());

        let marker = painting
            .begin_stroke("marker", Color::new(0.2, 0.4, 0.6), 0.1)
            .unwrap();
        for i in 0..5 {
            painting
                .feed_point(marker, sample(i as f32 * 0.1, 0.3, -0.7, 100 + i))
                .unwrap();
        }

        let flat = painting
            .begin_stroke("flat", Color::new(1.0, 0.0, 0.0), 0.05)
            .unwrap();
        for i in 0..3 {
            painting
                .feed_point(flat, sample(1.0, i as f32 * 0.25, 0.0, 200 + i))
                .unwrap();
        }
        painting
    }

    fn assert_same_strokes(a: &Painting, b: &Painting, epsilon: f32) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.strokes().iter().zip(b.strokes()) {
            assert_eq!(x.brush_name(), y.brush_name());
            assert_eq!(x.len(), y.len());
            assert_abs_diff_eq!(x.size(), y.size(), epsilon = epsilon);
            for (c, d) in x.color().to_array().iter().zip(y.color().to_array()) {
                assert_abs_diff_eq!(*c, d, epsilon = epsilon);
            }
            for (p, q) in x.points().iter().zip(y.points()) {
                assert_eq!(p.timestamp, q.timestamp);
                assert_abs_diff_eq!(p.pressure, q.pressure, epsilon = epsilon);
                assert!(p.position.abs_diff_eq(q.position, epsilon));
                assert!(p.orientation.abs_diff_eq(q.orientation, epsilon));
            }
        }
    }

    #[test]
    fn test_flat_scenario_binary_round_trip() {
        let mut registry = BrushRegistry::new();
        registry
            .register_brush::<FlatBrush>("flat", BrushOptions::new(0.01, 0))
            .unwrap();
        let registry = Arc::new(registry);

        let mut painting = Painting::new(Arc::clone(&registry));
        let handle = painting
            .begin_stroke("flat", Color::new(1.0, 0.0, 0.0), 0.05)
            .unwrap();
        for (i, z) in [0.0, 0.005, 0.02].into_iter().enumerate() {
            painting
                .feed_point(handle, PointSample::at(Vec3::new(0.0, 0.0, z), Quat::IDENTITY, 1.0, i as u32))
                .unwrap();
        }

        let bytes = painting.to_binary().unwrap();
        let mut reloaded = Painting::new(registry);
        let report = reloaded.load_binary(&bytes).unwrap();

        assert_eq!(report.strokes_created, 1);
        assert!(report.warnings.is_empty());
        let positions: Vec<Vec3> = reloaded.strokes()[0]
            .points()
            .iter()
            .map(|p| p.position)
            .collect();
        assert_eq!(positions, vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 0.02)]);
        assert_eq!(reloaded.strokes()[0].color(), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_binary_round_trip_is_exact() {
        let painting = drawn_painting();
        let bytes = painting.to_binary().unwrap();

        let mut reloaded = Painting::new(Arc::clone(painting.registry()));
        let report = reloaded.load_binary(&bytes).unwrap();

        assert_eq!(report.format, Format::Binary);
        assert_eq!(report.points_dropped, 0);
        assert_eq!(report.points_admitted, 8);
        assert_same_strokes(&painting, &reloaded, 0.0);
        assert_eq!(reloaded.to_binary().unwrap(), bytes);
    }

    #[test]
    fn test_structured_round_trip_within_precision() {
        let painting = drawn_painting();
        let json = painting.to_json_string().unwrap();

        let mut reloaded = Painting::new(Arc::clone(painting.registry()));
        let report = reloaded.load_json_str(&json).unwrap();

        assert_eq!(report.format, Format::Structured);
        assert_eq!(report.strokes_created, 2);
        assert_same_strokes(&painting, &reloaded, 1e-6);
    }

    #[test]
    fn test_used_brush_table_and_indices() {
        let painting = drawn_painting();
        let document = painting.to_document().unwrap();

        // Registration order, not first-use order; "ribbon" never used
        assert_eq!(document.brushes, vec!["flat".to_string(), "marker".to_string()]);
        for (record, stroke) in document.strokes.iter().zip(painting.strokes()) {
            assert_eq!(document.brush_name(record.brush_index), Some(stroke.brush_name()));
        }

        let tree = painting.to_structured().unwrap();
        assert_eq!(tree.strokes[0].brush.index, 1);
        assert_eq!(tree.strokes[1].brush.index, 0);
    }

    #[test]
    fn test_indices_recomputed_per_export() {
        let mut painting = drawn_painting();
        assert_eq!(painting.to_document().unwrap().strokes[1].brush_index, 0);

        painting.begin_stroke("ribbon", Color::default(), 0.1).unwrap();
        let document = painting.to_document().unwrap();
        assert_eq!(document.brushes, vec!["flat", "ribbon", "marker"]);
        assert_eq!(document.strokes[0].brush_index, 2);
        assert_eq!(document.strokes[2].brush_index, 1);
    }

    #[test]
    fn test_bad_magic_creates_nothing() {
        let mut bytes = drawn_painting().to_binary().unwrap();
        bytes[1..9].copy_from_slice(b"notpaint");

        let mut reloaded = Painting::new(registry());
        let created = Arc::new(AtomicUsize::new(0));
        let created_clone = Arc::clone(&created);
        reloaded.add_event_listener(move |_| {
            created_clone.fetch_add(1, Ordering::SeqCst);
        });

        let err = reloaded.load_binary(&bytes).unwrap_err();
        assert!(matches!(err, LoadError::InvalidFormat { .. }));
        assert!(reloaded.is_empty());
        assert_eq!(created.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_truncated_buffer_creates_nothing() {
        let bytes = drawn_painting().to_binary().unwrap();
        let mut reloaded = Painting::new(registry());
        let err = reloaded.load_binary(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, LoadError::Codec(_)));
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_version_mismatch_is_a_warning() {
        let mut bytes = drawn_painting().to_binary().unwrap();
        bytes[9..11].copy_from_slice(&7u16.to_le_bytes());

        let mut reloaded = Painting::new(registry());
        let report = reloaded.load_binary(&bytes).unwrap();
        assert_eq!(report.version, 7);
        assert_eq!(
            report.warnings,
            vec![LoadWarning::VersionMismatch {
                found: 7,
                expected: FORMAT_VERSION
            }]
        );
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_strict_version_is_fatal() {
        let mut tree = drawn_painting().to_structured().unwrap();
        tree.version = 2;

        let config = PainterConfig {
            strict_version: true,
            ..Default::default()
        };
        let mut reloaded = Painting::with_config(registry(), config);
        let err = reloaded.load_structured(&tree).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnsupportedVersion {
                found: 2,
                expected: FORMAT_VERSION
            }
        ));
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_unknown_brush_substituted_on_load() {
        let mut tree = drawn_painting().to_structured().unwrap();
        tree.brushes[1] = "spray".into();
        tree.strokes[1].brush.index = 9;

        let mut reloaded = Painting::new(registry());
        let report = reloaded.load_structured(&tree).unwrap();

        assert_eq!(
            report.warnings,
            vec![
                LoadWarning::UnknownBrush {
                    requested: Some("spray".into()),
                    substituted: "flat".into()
                },
                LoadWarning::UnknownBrush {
                    requested: None,
                    substituted: "flat".into()
                },
            ]
        );
        assert_eq!(reloaded.strokes()[0].brush_name(), "flat");
        assert_eq!(reloaded.strokes()[1].brush_name(), "flat");
    }

    #[test]
    fn test_reload_refilters_with_current_policy() {
        let bytes = drawn_painting().to_binary().unwrap();

        // Same names, but "marker" now keeps at most two points
        let mut registry = BrushRegistry::new();
        registry
            .register_brush::<FlatBrush>("flat", BrushOptions::new(0.01, 0))
            .unwrap();
        registry
            .register_brush::<FlatBrush>("marker", BrushOptions::new(0.0, 2))
            .unwrap();
        let registry = Arc::new(registry);

        let mut refiltered = Painting::new(Arc::clone(&registry));
        let report = refiltered.load_binary(&bytes).unwrap();
        assert_eq!(refiltered.strokes()[0].len(), 2);
        assert_eq!(report.points_dropped, 3);

        let config = PainterConfig {
            refilter_on_load: false,
            ..Default::default()
        };
        let mut verbatim = Painting::with_config(registry, config);
        let report = verbatim.load_binary(&bytes).unwrap();
        assert_eq!(verbatim.strokes()[0].len(), 5);
        assert_eq!(report.points_dropped, 0);
    }

    #[test]
    fn test_load_emits_same_events_as_capture() {
        let painting = drawn_painting();
        let bytes = painting.to_binary().unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);
        let mut reloaded = Painting::new(Arc::clone(painting.registry()));
        reloaded.add_event_listener(move |event| events_clone.lock().unwrap().push(event));
        reloaded.load_binary(&bytes).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            PaintingEvent::StrokeCreated { brush, .. } if brush == "marker"
        ));
        assert!(matches!(
            &events[1],
            PaintingEvent::StrokeCreated { brush, .. } if brush == "flat"
        ));
        assert_eq!(
            events[2],
            PaintingEvent::ModelLoaded {
                format: Format::Binary,
                strokes: 2
            }
        );
    }

    #[test]
    fn test_load_marks_brushes_used() {
        let bytes = drawn_painting().to_binary().unwrap();
        let registry = registry();
        let mut reloaded = Painting::new(Arc::clone(&registry));
        reloaded.load_binary(&bytes).unwrap();
        assert_eq!(registry.list_used(), vec!["flat", "marker"]);
    }

    #[test]
    fn test_load_without_brushes_fails() {
        let bytes = drawn_painting().to_binary().unwrap();
        let mut reloaded = Painting::new(Arc::new(BrushRegistry::new()));
        let err = reloaded.load_binary(&bytes).unwrap_err();
        assert!(matches!(err, LoadError::Painting(PaintingError::NoBrushes)));
    }

    #[test]
    fn test_save_and_load_files() {
        let painting = drawn_painting();
        let dir = std::env::temp_dir().join(format!("apainter-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        for name in ["drawing.apa", "drawing.json"] {
            let path = dir.join(name);
            let format = painting.save_file(&path).unwrap();

            let mut reloaded = Painting::new(Arc::clone(painting.registry()));
            let report = reloaded.load_file(&path).unwrap();
            assert_eq!(report.format, format);
            assert_same_strokes(&painting, &reloaded, 1e-6);
        }

        let err = painting.save_file(dir.join("drawing.png")).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedExtension(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
